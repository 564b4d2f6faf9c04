//! Profile update and avatar upload

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::models::Profile;
use crate::store::{select_one_as, ObjectStore, RecordStore};

use super::model::UpdateProfileRequest;

const USERS_TABLE: &str = "users";

pub struct ProfileService {
    store: Arc<dyn RecordStore>,
    objects: Arc<dyn ObjectStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn RecordStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { store, objects }
    }

    /// Apply a partial profile update and return the refreshed profile.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> ApiResult<Profile> {
        req.validate()?;
        if req.is_empty() {
            return Err(ApiError::Validation(
                "No profile fields to update".to_string(),
            ));
        }

        let mut patch = serde_json::Map::new();
        if let Some(v) = req.full_name {
            patch.insert("full_name".to_string(), json!(v));
        }
        if let Some(v) = req.username {
            patch.insert("username".to_string(), json!(v));
        }
        if let Some(v) = req.country {
            patch.insert("country".to_string(), json!(v));
        }
        if let Some(v) = req.address {
            patch.insert("address".to_string(), json!(v));
        }
        if let Some(v) = req.contact_number {
            patch.insert("contact_number".to_string(), json!(v));
        }
        if let Some(v) = req.whatsapp_number {
            patch.insert("whatsapp_number".to_string(), json!(v));
        }

        let id = user_id.to_string();
        self.store
            .update(USERS_TABLE, &[("id", &id)], serde_json::Value::Object(patch))
            .await?;

        self.fetch(user_id).await
    }

    /// Upload an avatar image, write its public URL back to the profile, and
    /// return the URL. Uploads overwrite any previous avatar for the user.
    pub async fn upload_avatar(
        &self,
        user_id: Uuid,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<String> {
        if bytes.is_empty() {
            return Err(ApiError::Validation("Avatar image is empty".to_string()));
        }
        let ext = file_name
            .rsplit('.')
            .next()
            .filter(|e| matches!(*e, "png" | "jpg" | "jpeg" | "webp"))
            .ok_or_else(|| {
                ApiError::Validation("Avatar must be a png, jpg, jpeg, or webp image".to_string())
            })?;

        let path = format!("{}.{}", user_id, ext);
        self.objects.upload(&path, bytes, content_type).await?;
        let url = self.objects.public_url(&path);

        let id = user_id.to_string();
        self.store
            .update(USERS_TABLE, &[("id", &id)], json!({ "avatar_url": url }))
            .await?;

        tracing::info!(%user_id, "Avatar updated");
        Ok(url)
    }

    async fn fetch(&self, user_id: Uuid) -> ApiResult<Profile> {
        let id = user_id.to_string();
        select_one_as(self.store.as_ref(), USERS_TABLE, &[("id", &id)])
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::MemoryStore;
    use crate::store::StoreError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MemoryObjects {
        uploads: Mutex<Vec<String>>,
    }

    impl MemoryObjects {
        fn new() -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryObjects {
        async fn upload(
            &self,
            path: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<(), StoreError> {
            self.uploads.lock().unwrap().push(path.to_string());
            Ok(())
        }

        fn public_url(&self, path: &str) -> String {
            format!("https://cdn.example.com/avatars/{}", path)
        }
    }

    fn seller_row(id: Uuid) -> serde_json::Value {
        json!({
            "role": "seller",
            "id": id,
            "email": "vendor@example.com",
            "created_at": "2024-03-01T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_update_profile_patches_and_returns_profile() {
        let id = Uuid::new_v4();
        let store = Arc::new(MemoryStore::with_rows(USERS_TABLE, vec![seller_row(id)]));
        let svc = ProfileService::new(store.clone(), Arc::new(MemoryObjects::new()));

        let req: UpdateProfileRequest =
            serde_json::from_value(json!({ "username": "colombo-trader" })).unwrap();
        let profile = svc.update_profile(id, req).await.unwrap();

        let seller = profile.as_seller().unwrap();
        assert_eq!(seller.username.as_deref(), Some("colombo-trader"));
    }

    #[tokio::test]
    async fn test_empty_patch_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let svc = ProfileService::new(store, Arc::new(MemoryObjects::new()));

        let req: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        let err = svc.update_profile(Uuid::new_v4(), req).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_avatar_writes_url_back() {
        let id = Uuid::new_v4();
        let store = Arc::new(MemoryStore::with_rows(USERS_TABLE, vec![seller_row(id)]));
        let objects = Arc::new(MemoryObjects::new());
        let svc = ProfileService::new(store.clone(), objects.clone());

        let url = svc
            .upload_avatar(id, "me.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(url, format!("https://cdn.example.com/avatars/{}.png", id));
        assert_eq!(objects.uploads.lock().unwrap().len(), 1);
        assert_eq!(store.rows(USERS_TABLE)[0]["avatar_url"], json!(url));
    }

    #[tokio::test]
    async fn test_upload_avatar_rejects_unknown_extension() {
        let svc = ProfileService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryObjects::new()),
        );
        let err = svc
            .upload_avatar(Uuid::new_v4(), "malware.exe", "application/x-dosexec", vec![1])
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
