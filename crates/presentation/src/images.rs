use futures::future::join_all;
use galileo_core::generation::slide_image_prompt;
use galileo_core::GenerationService;

use crate::slides::{PresentationSlide, PresentationSlideData};

/// Request every slide's illustration at once and wait for all of them.
///
/// A failed or empty answer leaves that slide without an image; the other
/// slides are unaffected. Output order matches input order.
pub async fn generate_slide_images(
    service: &dyn GenerationService,
    slides: Vec<PresentationSlideData>,
) -> Vec<PresentationSlide> {
    let total = slides.len();
    let requests = slides.into_iter().enumerate().map(move |(index, data)| async move {
        let prompt = slide_image_prompt(&data.image_prompt);
        let image_base64 = match service.generate_image(&prompt).await {
            Ok(Some(image)) if !image.is_empty() => {
                log::debug!("Presentation: image {} of {} ready", index + 1, total);
                Some(image)
            }
            Ok(_) => {
                log::warn!("Presentation: no image returned for slide {}", index + 1);
                None
            }
            Err(e) => {
                log::warn!("Presentation: image for slide {} failed: {}", index + 1, e);
                None
            }
        };
        PresentationSlide { data, image_base64 }
    });
    join_all(requests).await
}
