pub mod keyframe;
