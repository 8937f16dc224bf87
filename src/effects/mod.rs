pub mod kind;
pub mod motion;
pub mod pulse;
pub mod typewriter;
