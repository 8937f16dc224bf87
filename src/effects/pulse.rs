use crate::{
    animation::keyframe::{Interpolation, KeyValue, KeyframeEvent, PropertyPath},
    compositing::uv_fit::UvFitTransform,
    foundation::core::{FrameIndex, FrameInterval, FrameRate, ObjectId, Vec2},
    foundation::math::RandomSource,
};

/// Historic name of the pulse; both directions share one schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomDirection {
    In,
    Out,
}

/// Timing and shape of the zoom pulse. Durations are in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PulseParams {
    /// Uniform range of the rest before each zoom.
    pub wait_secs: (f64, f64),
    /// Uniform range of the zoomed hold.
    pub hold_secs: (f64, f64),
    /// Length of each zoom ramp (in and out).
    pub ramp_secs: f64,
    /// Minimum rest between the last zoom-out and the end of the window.
    pub settle_secs: f64,
    /// Zoomed scale relative to the resting scale.
    pub zoom_factor: f64,
    /// Texture-space y location while zoomed.
    pub zoomed_offset_y: f64,
    /// Hard bound on cycles per invocation.
    pub max_cycles: u32,
}

impl Default for PulseParams {
    fn default() -> Self {
        Self {
            wait_secs: (4.0, 6.0),
            hold_secs: (4.0, 6.0),
            ramp_secs: 0.5,
            settle_secs: 0.5,
            zoom_factor: 0.9,
            zoomed_offset_y: 0.88,
            max_cycles: 256,
        }
    }
}

impl PulseParams {
    /// Seconds a cycle needs after its rest in the worst case, including the settle margin.
    pub fn worst_case_cycle_secs(&self) -> f64 {
        self.ramp_secs + self.hold_secs.1 + self.ramp_secs + self.settle_secs
    }

    /// Shortest window that can hold one cycle.
    pub fn min_window_secs(&self) -> f64 {
        self.wait_secs.0 + self.worst_case_cycle_secs()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PulseSchedule {
    pub events: Vec<KeyframeEvent>,
    pub cycles: u32,
}

/// Repeated "zoom in, hold, zoom back" cycles on the mapping scale and location.
///
/// A cycle is only started when its worst-case length still fits before `window.end`, so the
/// object always ends pinned at its resting mapping. Frames derived from fractional seconds
/// are truncated.
pub fn zoom_pulse(
    target: ObjectId,
    window: FrameInterval,
    frame_rate: FrameRate,
    base: UvFitTransform,
    params: &PulseParams,
    rng: &mut dyn RandomSource,
) -> PulseSchedule {
    let rest_scale = base.scale();
    let rest_offset = base.offset();
    let zoom_scale = rest_scale * params.zoom_factor;
    let zoom_offset = Vec2::new(rest_offset.x, params.zoomed_offset_y);

    let mut events = Vec::new();
    let mut push = |frame: FrameIndex, scale: Vec2, offset: Vec2| {
        for (property, value) in [
            (PropertyPath::UvScale, scale),
            (PropertyPath::UvOffset, offset),
        ] {
            events.push(KeyframeEvent::new(
                target,
                property,
                frame,
                KeyValue::Vec2(value),
                Interpolation::Linear,
            ));
        }
    };

    push(window.start, rest_scale, rest_offset);

    let fps = frame_rate.as_f64();
    let end = window.end.0 as f64;
    let needed = params.worst_case_cycle_secs() * fps;
    let ramp = params.ramp_secs * fps;

    let mut cycles = 0u32;
    let mut current = window.start.0 as f64;
    while current < end && cycles < params.max_cycles {
        let zoom_start = current + rng.uniform(params.wait_secs.0, params.wait_secs.1) * fps;
        if zoom_start + needed > end {
            break;
        }
        let zoom_in_end = zoom_start + ramp;
        let hold_end = zoom_in_end + rng.uniform(params.hold_secs.0, params.hold_secs.1) * fps;
        let zoom_out_end = hold_end + ramp;

        push(FrameIndex(zoom_start as i64 - 1), rest_scale, rest_offset);
        push(FrameIndex(zoom_in_end as i64), zoom_scale, zoom_offset);
        push(FrameIndex(hold_end as i64), zoom_scale, zoom_offset);
        push(FrameIndex(zoom_out_end as i64), rest_scale, rest_offset);

        cycles += 1;
        current = zoom_out_end;
    }

    push(window.end, rest_scale, rest_offset);

    PulseSchedule { events, cycles }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pulse.rs"]
mod tests;
