impl Scene for FarmScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.state = load_game(&self.save_path).unwrap_or_else(|| GameState::initial(self.clock_ms));
        self.state.last_update_ms = self.clock_ms;
        self.hovered = None;
        self.caches.clear(world);
        self.sync(world);
        info!(
            renderable_count = world.renderable_count(),
            coins = self.state.coins,
            level = self.state.level,
            "scene_loaded"
        );
    }

    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot, world: &mut SceneWorld) {
        apply_camera_input(world.camera_mut(), input, fixed_dt_seconds);

        if let Some(tool) = input.tool_slot_pressed().and_then(Tool::from_hotbar_slot) {
            if select_tool(&mut self.state, tool).is_ok() {
                debug!(tool = %tool, "tool_selected");
            }
        }

        let cursor_tile = cursor_tile(world.camera(), input);
        if input.left_click_pressed() {
            if let Some((x, z)) = cursor_tile {
                let tool = self.state.selected_tool;
                if apply_tool(&mut self.state, tool, x, z, self.clock_ms).is_ok() {
                    debug!(tool = %tool, x, z, "tool_applied");
                }
            }
        }
        if input.right_click_pressed() {
            if let Some((x, z)) = cursor_tile {
                if harvest_at(&mut self.state, x, z).is_ok() {
                    debug!(x, z, "harvested");
                }
            }
        }

        self.advance_clock(fixed_dt_seconds);
        self.handle_commands(input, world);

        self.hovered = cursor_tile
            .map(|(x, z)| ChunkId::containing(x, z))
            .filter(|id| self.state.chunk(*id).is_some_and(|chunk| !chunk.is_owned));
        self.sync(world);
    }

    fn render(&mut self, _world: &SceneWorld) {}

    fn unload(&mut self, world: &mut SceneWorld) {
        let effects = self.caches.clear(world);
        info!(destroyed = effects.destroyed(), "scene_unloaded");
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        let hover = self
            .hovered
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        Some(format!(
            "Homestead | Coins: {} | Level: {} | Tool: {} | Chunk: {hover}",
            self.state.coins, self.state.level, self.state.selected_tool
        ))
    }
}

impl FarmScene {
    fn advance_clock(&mut self, dt_seconds: f32) {
        if !dt_seconds.is_finite() || dt_seconds <= 0.0 {
            return;
        }
        self.clock_ms = self
            .clock_ms
            .saturating_add((dt_seconds * 1000.0).round() as u64);
        if self.clock_ms.saturating_sub(self.state.last_update_ms) < GROWTH_INTERVAL_MS {
            return;
        }
        let advanced = catch_up(&mut self.state, self.clock_ms);
        if advanced > 0 {
            debug!(advanced, "growth_stages_advanced");
        }
    }

    fn handle_commands(&mut self, input: &InputSnapshot, world: &mut SceneWorld) {
        if input.command_pressed(CommandKey::BuySeed) && buy_selected_seed(&mut self.state).is_ok()
        {
            debug!(coins = self.state.coins, "seed_bought");
        }
        if input.command_pressed(CommandKey::SellProduce)
            && sell_selected_produce(&mut self.state).is_ok()
        {
            debug!(coins = self.state.coins, "produce_sold");
        }
        if input.command_pressed(CommandKey::BuyTool) && buy_next_tool(&mut self.state).is_ok() {
            debug!(coins = self.state.coins, "tool_bought");
        }
        if input.command_pressed(CommandKey::Save) {
            save_game(&self.save_path, &self.state);
        }
        if input.command_pressed(CommandKey::Load) {
            self.reload(world);
        }
        if input.command_pressed(CommandKey::ClearSave) {
            clear_saved_game(&self.save_path);
        }
    }

    /// Swaps in the saved farm. A failed load keeps the current farm.
    fn reload(&mut self, world: &mut SceneWorld) {
        let Some(mut state) = load_game(&self.save_path) else {
            return;
        };
        state.last_update_ms = self.clock_ms;
        self.state = state;
        self.hovered = None;
        self.caches.clear(world);
    }

    fn sync(&mut self, world: &mut SceneWorld) {
        let report = sync_farm(&self.state, world, &mut self.caches, self.hovered);
        self.hovered = report.hovered;
    }
}
