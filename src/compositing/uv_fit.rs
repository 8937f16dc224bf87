use crate::foundation::{
    core::Vec2,
    error::{CaptionError, CaptionResult},
};

/// Texture-space scale and offset that make a source bitmap cover a plane.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UvFitTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for UvFitTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl UvFitTransform {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    /// Cover-fit crop of an `image_w × image_h` bitmap onto a `plane_w × plane_h` plane.
    ///
    /// The overflowing axis is cropped symmetrically; the result never letterboxes.
    pub fn cover(image_w: f64, image_h: f64, plane_w: f64, plane_h: f64) -> CaptionResult<Self> {
        for (name, v) in [
            ("image width", image_w),
            ("image height", image_h),
            ("plane width", plane_w),
            ("plane height", plane_h),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(CaptionError::host(format!(
                    "cover fit needs a finite positive {name}, got {v}"
                )));
            }
        }

        let image_aspect = image_w / image_h;
        let plane_aspect = plane_w / plane_h;

        if image_aspect > plane_aspect {
            let scale_x = plane_aspect / image_aspect;
            Ok(Self {
                scale_x,
                scale_y: 1.0,
                offset_x: (1.0 - scale_x) / 2.0,
                offset_y: 0.0,
            })
        } else {
            let scale_y = image_aspect / plane_aspect;
            Ok(Self {
                scale_x: 1.0,
                scale_y,
                offset_x: 0.0,
                offset_y: (1.0 - scale_y) / 2.0,
            })
        }
    }

    /// `true` when [`UvFitTransform::cover`] took the horizontal-crop branch.
    pub fn crops_horizontally(self) -> bool {
        self.scale_x < 1.0
    }

    pub fn offset(self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }

    pub fn scale(self) -> Vec2 {
        Vec2::new(self.scale_x, self.scale_y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositing/uv_fit.rs"]
mod tests;
