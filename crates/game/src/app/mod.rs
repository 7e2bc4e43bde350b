mod bootstrap;
mod farm;
mod gameplay;
mod loop_runner;
mod sync;

pub(crate) use loop_runner::run;
