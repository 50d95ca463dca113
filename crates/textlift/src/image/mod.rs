//! Image normalization and preprocessing variants.
pub mod normalize;
pub mod raster;
pub mod variants;

pub use normalize::{MAX_SIDE, decode_image, load_and_normalize, normalize, scaled_dimensions, upscale};
pub use raster::{RESAMPLE_FILTER, RasterImage};
pub use variants::{
    Variant, VariantKind, binarize, enhance_contrast, generate_variants, hard_variant, median_smooth, soft_variant,
};
