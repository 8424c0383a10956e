use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{Service, ServiceError};
use super::user::normalize_username;
use crate::Result;
use crate::image::{Image, ImageBody, ImageError, NewImage};
use crate::token::Claim;

const IMAGE_FIELD: &str = "image";

/// Trim an image reference and check that it is an absolute http(s) URL.
fn validate_reference(reference: &str) -> Result<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ServiceError::RequiredField { field: IMAGE_FIELD }.into());
    }

    let valid = match url::Url::parse(reference) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    };
    if !valid {
        return Err(ServiceError::InvalidUrl { field: IMAGE_FIELD }.into());
    }
    Ok(reference.to_string())
}

/// Pick one element uniformly, with a generator seeded from OS entropy.
fn pick_random<T>(items: &[T]) -> Option<&T> {
    let mut rng = StdRng::from_entropy();
    items.choose(&mut rng)
}

impl Service {
    /// All images of the claim's user.
    pub async fn get_images(&self, claim: &Claim) -> Result<Vec<Image>> {
        self.images.get(claim.user_id).await
    }

    /// Add an image reference for the claim's user.
    pub async fn create_image(&self, claim: &Claim, reference: &str) -> Result<Image> {
        let image = validate_reference(reference)?;
        self.images
            .create(NewImage {
                user_id: claim.user_id,
                image,
            })
            .await
    }

    /// Replace the reference of one of the claim's user's images.
    pub async fn update_image(&self, claim: &Claim, id: i64, reference: &str) -> Result<Image> {
        let image = Image {
            id,
            user_id: claim.user_id,
            image: validate_reference(reference)?,
        };
        self.images.update(&image).await?;
        Ok(image)
    }

    /// Delete one of the claim's user's images.
    pub async fn delete_image(&self, claim: &Claim, id: i64) -> Result<()> {
        self.images.delete(id, claim.user_id).await
    }

    /// Stream a uniformly chosen image of the named user.
    pub async fn random_image(&self, username: &str) -> Result<ImageBody> {
        let user = self
            .users
            .get_by_username(&normalize_username(username))
            .await?;
        let images = self.images.get(user.id).await?;

        let chosen = pick_random(&images).ok_or(ImageError::NotFound { id: None })?;
        tracing::debug!(user_id = user.id, image_id = chosen.id, "Serving random image");
        self.fetcher.download(&chosen.image).await
    }
}
