pub mod recording;
pub mod scene_host;
