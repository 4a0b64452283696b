//! Core domain types for photo assessment and enhancement.

mod adjustment;
mod image_info;
mod record;
mod result;

pub use adjustment::AdjustmentVector;
pub use image_info::ImageInfo;
pub use record::AnalysisRecord;
pub use result::{
    AnalysisResult, BoundingBox, ChannelStats, ColorBalance, ImageDimensions, SharpnessLevel,
};
