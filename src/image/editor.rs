//! Image editor trait and the style/outfit operations built on it.

use crate::error::Result;
use crate::image::types::{ImagePayload, TransformedImage};
use crate::prompt::{outfit_instruction, StyleId};
use async_trait::async_trait;

/// A remote model that edits an image according to a text instruction.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// Sends the image and instruction in a single request.
    ///
    /// Returns `Ok(None)` when the response carries no inline image.
    async fn edit(&self, image: &ImagePayload, instruction: &str)
        -> Result<Option<TransformedImage>>;

    /// Returns the model identifier requests are sent to.
    fn model(&self) -> &str;
}

/// Style transfer and outfit replacement on top of any [`ImageEditor`].
#[async_trait]
pub trait ImageEditorExt: ImageEditor {
    /// Redraws the image in the given artistic style.
    async fn apply_style(
        &self,
        image: &ImagePayload,
        style: StyleId,
    ) -> Result<Option<TransformedImage>> {
        tracing::debug!(%style, model = self.model(), "applying style");
        run(self, image, style.instruction(), "style").await
    }

    /// Replaces the subject's clothing with the described outfit, leaving
    /// identity, pose, and background alone.
    ///
    /// The description is not validated here.
    async fn apply_outfit_description(
        &self,
        image: &ImagePayload,
        description: &str,
    ) -> Result<Option<TransformedImage>> {
        tracing::debug!(model = self.model(), "applying outfit description");
        let instruction = outfit_instruction(description);
        run(self, image, &instruction, "outfit").await
    }
}

impl<T: ImageEditor + ?Sized> ImageEditorExt for T {}

async fn run<E: ImageEditor + ?Sized>(
    editor: &E,
    image: &ImagePayload,
    instruction: &str,
    operation: &'static str,
) -> Result<Option<TransformedImage>> {
    match editor.edit(image, instruction).await {
        Ok(Some(result)) => {
            tracing::debug!(operation, mime_type = result.mime_type(), "received image");
            Ok(Some(result))
        }
        Ok(None) => {
            tracing::warn!(operation, model = editor.model(), "no image in response");
            Ok(None)
        }
        Err(e) => {
            tracing::error!(operation, model = editor.model(), "image edit failed: {e}");
            Err(e)
        }
    }
}
