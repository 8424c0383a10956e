use async_trait::async_trait;

use super::{Image, ImageError, ImageStore, NewImage};
use crate::Result;
use crate::db::{Database, SqlxResultExt};

/// Images stored in the `images` table.
#[derive(Debug, Clone)]
pub struct SqlImageStore {
    db: Database,
}

impl SqlImageStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ImageStore for SqlImageStore {
    async fn get(&self, user_id: i64) -> Result<Vec<Image>> {
        let rows: Vec<(i64, i64, String)> =
            sqlx::query_as("SELECT id, user_id, image FROM images WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(self.db.pool())
                .await
                .sql_context("Failed to get images")?;

        Ok(rows
            .into_iter()
            .map(|(id, user_id, image)| Image { id, user_id, image })
            .collect())
    }

    async fn create(&self, image: NewImage) -> Result<Image> {
        let (id,): (i64,) =
            sqlx::query_as("INSERT INTO images (user_id, image) VALUES ($1, $2) RETURNING id")
                .bind(image.user_id)
                .bind(&image.image)
                .fetch_one(self.db.pool())
                .await
                .sql_context("Failed to create image")?;

        Ok(Image {
            id,
            user_id: image.user_id,
            image: image.image,
        })
    }

    async fn update(&self, image: &Image) -> Result<()> {
        let result = sqlx::query("UPDATE images SET image = $1 WHERE id = $2 AND user_id = $3")
            .bind(&image.image)
            .bind(image.id)
            .bind(image.user_id)
            .execute(self.db.pool())
            .await
            .sql_context("Failed to update image")?;

        if result.rows_affected() == 0 {
            return Err(ImageError::NotFound { id: Some(image.id) }.into());
        }
        Ok(())
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.db.pool())
            .await
            .sql_context("Failed to delete image")?;

        if result.rows_affected() == 0 {
            return Err(ImageError::NotFound { id: Some(id) }.into());
        }
        Ok(())
    }
}
