use crate::app::RenderableId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOp {
    Created(RenderableId),
    /// Transform changed, handle kept.
    Updated(RenderableId),
    Destroyed(RenderableId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneEffect {
    pub family: &'static str,
    pub op: SceneOp,
}

/// Ordered record of what one or more reconciliation passes did to the scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncEffects {
    effects: Vec<SceneEffect>,
}

impl SyncEffects {
    pub fn push(&mut self, family: &'static str, op: SceneOp) {
        self.effects.push(SceneEffect { family, op });
    }

    pub fn extend(&mut self, other: SyncEffects) {
        self.effects.extend(other.effects);
    }

    pub fn as_slice(&self) -> &[SceneEffect] {
        &self.effects
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn created(&self) -> usize {
        self.count(|op| matches!(op, SceneOp::Created(_)))
    }

    pub fn updated(&self) -> usize {
        self.count(|op| matches!(op, SceneOp::Updated(_)))
    }

    pub fn destroyed(&self) -> usize {
        self.count(|op| matches!(op, SceneOp::Destroyed(_)))
    }

    pub fn for_family<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a SceneEffect> + 'a {
        self.effects
            .iter()
            .filter(move |effect| effect.family == family)
    }

    fn count(&self, predicate: impl Fn(&SceneOp) -> bool) -> usize {
        self.effects
            .iter()
            .filter(|effect| predicate(&effect.op))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_split_by_operation() {
        let mut effects = SyncEffects::default();
        effects.push("tile", SceneOp::Created(RenderableId(1)));
        effects.push("tile", SceneOp::Created(RenderableId(2)));
        effects.push("crop", SceneOp::Updated(RenderableId(3)));
        effects.push("crop", SceneOp::Destroyed(RenderableId(4)));

        assert_eq!(effects.len(), 4);
        assert_eq!(effects.created(), 2);
        assert_eq!(effects.updated(), 1);
        assert_eq!(effects.destroyed(), 1);
        assert_eq!(effects.for_family("crop").count(), 2);
    }

    #[test]
    fn extend_preserves_order() {
        let mut first = SyncEffects::default();
        first.push("tile", SceneOp::Destroyed(RenderableId(1)));
        let mut second = SyncEffects::default();
        second.push("tile", SceneOp::Created(RenderableId(2)));

        first.extend(second);

        assert_eq!(
            first.as_slice().iter().map(|effect| effect.op).collect::<Vec<_>>(),
            vec![
                SceneOp::Destroyed(RenderableId(1)),
                SceneOp::Created(RenderableId(2))
            ]
        );
    }
}
