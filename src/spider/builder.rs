use serde::{Deserialize, Serialize};

use super::{SpiderGeometry, UniformSpider};
use crate::{Builder, OptiwaveError, TomlConfig};

/// `UniformSpider` builder
///
/// Default properties:
///  - width of image   : 25.5m
///  - number of pixels : 512px
///  - radius of spider : 12.75m
///  - centre of spider : [0,0]m
///  - number of struts : 4
///  - width of struts  : 10cm
///  - rotation         : 0rd
///
/// # Examples
///
/// - 3 struts 5cm wide rotated by 30 degrees
///
/// ```
/// use optiwave::{Builder, FromBuilder, Spider, UniformSpider};
/// let spider = UniformSpider::builder()
///     .number_of_struts(3)
///     .width_of_struts(0.05)
///     .rotation_degree(30.)
///     .build()?;
/// let mask = spider.spider();
/// # Ok::<(), optiwave::OptiwaveError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformSpiderBuilder {
    pub width_of_image: f64,
    pub number_of_pixels: usize,
    pub radius_of_spider: f64,
    pub centre_of_spider: [f64; 2],
    pub number_of_struts: usize,
    pub width_of_struts: f64,
    pub rotation: f64,
}
impl Default for UniformSpiderBuilder {
    fn default() -> Self {
        Self {
            width_of_image: 25.5,
            number_of_pixels: 512,
            radius_of_spider: 12.75,
            centre_of_spider: [0.; 2],
            number_of_struts: 4,
            width_of_struts: 0.1,
            rotation: 0.,
        }
    }
}
impl TomlConfig for UniformSpiderBuilder {
    const NAME: &'static str = "UniformSpiderBuilder";
}
impl UniformSpiderBuilder {
    /// Sets the width of the image in meters
    pub fn width_of_image(self, width_of_image: f64) -> Self {
        Self {
            width_of_image,
            ..self
        }
    }
    /// Sets the number of pixels along one side of the image
    pub fn number_of_pixels(self, number_of_pixels: usize) -> Self {
        Self {
            number_of_pixels,
            ..self
        }
    }
    /// Sets the radius of the disk enclosing the spider in meters
    pub fn radius_of_spider(self, radius_of_spider: f64) -> Self {
        Self {
            radius_of_spider,
            ..self
        }
    }
    /// Sets the `[x,y]` centre of the spider in meters
    pub fn centre_of_spider(self, centre_of_spider: [f64; 2]) -> Self {
        Self {
            centre_of_spider,
            ..self
        }
    }
    pub fn number_of_struts(self, number_of_struts: usize) -> Self {
        Self {
            number_of_struts,
            ..self
        }
    }
    /// Sets the width of the struts in meters
    pub fn width_of_struts(self, width_of_struts: f64) -> Self {
        Self {
            width_of_struts,
            ..self
        }
    }
    /// Sets the global rotation in radians
    pub fn rotation(self, rotation: f64) -> Self {
        Self { rotation, ..self }
    }
    /// Sets the global rotation in degrees
    pub fn rotation_degree(self, rotation: f64) -> Self {
        Self {
            rotation: rotation.to_radians(),
            ..self
        }
    }
}
impl Builder for UniformSpiderBuilder {
    type Component = UniformSpider;
    /// Builds the `UniformSpider`
    fn build(self) -> crate::Result<Self::Component> {
        let invalid = |message: String| Err(OptiwaveError::InvalidGeometry(message));
        if self.number_of_pixels == 0 {
            return invalid("the number of pixels must be strictly positive".into());
        }
        if !(self.width_of_image.is_finite() && self.width_of_image > 0.) {
            return invalid(format!(
                "the width of the image must be strictly positive, found {}",
                self.width_of_image
            ));
        }
        if self.number_of_struts == 0 {
            return invalid("the number of struts must be strictly positive".into());
        }
        if self.radius_of_spider < 0. {
            return invalid(format!(
                "the radius of the spider must be positive, found {}",
                self.radius_of_spider
            ));
        }
        if self.width_of_struts < 0. {
            return invalid(format!(
                "the width of the struts must be positive, found {}",
                self.width_of_struts
            ));
        }
        log::debug!(
            "uniform spider: {} struts {:.3}m wide, rotated by {:.1}degree",
            self.number_of_struts,
            self.width_of_struts,
            self.rotation.to_degrees()
        );
        Ok(UniformSpider {
            geometry: SpiderGeometry {
                width_of_image: self.width_of_image,
                number_of_pixels: self.number_of_pixels,
                radius_of_spider: self.radius_of_spider,
                centre_of_spider: self.centre_of_spider,
            },
            number_of_struts: self.number_of_struts,
            width_of_struts: self.width_of_struts,
            rotation: self.rotation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FromBuilder, Spider};

    #[test]
    fn defaults() {
        let spider = UniformSpider::builder().build().unwrap();
        assert_eq!(spider.geometry().pixel_scale(), 25.5 / 512.);
        assert_eq!(spider.number_of_struts(), 4);
        assert_eq!(spider.angles().len(), 4);
    }

    #[test]
    fn invalid_geometry() {
        for builder in [
            UniformSpider::builder().number_of_pixels(0),
            UniformSpider::builder().width_of_image(0.),
            UniformSpider::builder().width_of_image(-1.),
            UniformSpider::builder().number_of_struts(0),
            UniformSpider::builder().width_of_struts(-0.1),
        ] {
            assert!(matches!(
                builder.build(),
                Err(OptiwaveError::InvalidGeometry(_))
            ));
        }
    }

    #[test]
    fn rotation_in_degree() {
        let spider = UniformSpider::builder()
            .number_of_struts(2)
            .rotation_degree(90.)
            .build()
            .unwrap();
        let angles = spider.angles();
        assert!((angles[0] - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert!((angles[1] - 3. * std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }
}
