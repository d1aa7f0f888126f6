//! Presentation layer of the pitch generator: slides, illustrations and the
//! word-weighted timeline that keeps slides in step with the narration.

mod error;
mod images;
mod slides;
mod timing;

pub use error::PresentationError;
pub use images::generate_slide_images;
pub use slides::{
    narration_script, parse_slides, PresentationSlide, PresentationSlideData,
    SLIDE_IMAGE_MIME_TYPE,
};
pub use timing::{word_count, SlideTimeline, SlideTiming};
