// ============================================================================
// Study Core - User Service
// File: crates/study-core/src/services/user_service.rs
// ============================================================================
//! User create/update transaction with avatar upload and role-specific persistence

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use study_shared::constants::AVATAR_FOLDER;
use study_shared::utils::mask_email;

use crate::domain::user::enabled_from_flag;
use crate::domain::{CallerContext, Image, Role, User};
use crate::error::DomainError;
use crate::ports::{ImageUpload, ObjectStorage, PasswordEncoder};
use crate::repositories::UserRepository;

/// Validated fields for a new account
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub password: String,
    /// 1 means enabled
    pub enable: i32,
}

/// Validated profile changes
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub full_name: String,
    pub phone: String,
}

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    storage: Arc<dyn ObjectStorage>,
    encoder: Arc<dyn PasswordEncoder>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        storage: Arc<dyn ObjectStorage>,
        encoder: Arc<dyn PasswordEncoder>,
    ) -> Self {
        Self {
            user_repo,
            storage,
            encoder,
        }
    }

    /// Register a user with `role`, optionally with an avatar.
    ///
    /// The avatar is stored before the row is written; if the write fails the
    /// stored object is left behind.
    pub async fn create(
        &self,
        caller: &CallerContext,
        request: CreateUser,
        role: Role,
        image: Option<ImageUpload>,
    ) -> Result<User, DomainError> {
        info!("Creating {} account for: {}", role.as_str(), mask_email(&request.email));

        if role == Role::Admin && !caller.is_admin() {
            warn!("Rejected admin account creation by caller {:?}", caller.user_id);
            return Err(DomainError::Forbidden("only admins can create admin accounts".into()));
        }

        // 1. Email must be unused
        if self.user_repo.find_by_email(&request.email).await?.is_some() {
            warn!("Create failed: email already exists: {}", mask_email(&request.email));
            return Err(DomainError::EmailAlreadyExists(request.email));
        }

        // 2. Phone must be unused
        if self.user_repo.find_by_phone(&request.phone).await?.is_some() {
            warn!("Create failed: phone already exists");
            return Err(DomainError::PhoneAlreadyExists(request.phone));
        }

        // 3. Build the record
        let password_hash = self.encoder.encode(&request.password)?;
        let mut user = User::new(
            request.email,
            request.phone,
            request.full_name,
            password_hash,
            enabled_from_flag(request.enable),
            role,
        );

        // 4. Avatar
        if let Some(upload) = image {
            upload.ensure_decodable()?;
            user.avatar = Some(self.store_avatar(&upload).await?);
        }

        // 5. Audit
        user.audit.stamp_create(caller.user_id);

        // 6. Role-specific persistence
        match role {
            Role::Admin => self.create_admin(user).await,
            Role::Student => self.create_student(user).await,
            Role::Teacher => self.create_teacher(user).await,
        }
    }

    /// Update name and phone, optionally replacing the avatar.
    ///
    /// The new image is decoded before anything is written, so an invalid file
    /// leaves both storage and the row untouched. Once decoded, the old object
    /// is deleted before the new one is uploaded; a failed upload at that point
    /// is not compensated.
    pub async fn update(
        &self,
        caller: &CallerContext,
        user_id: &Uuid,
        request: UpdateUser,
        image: Option<ImageUpload>,
    ) -> Result<User, DomainError> {
        // 1. Load
        let mut user = self.user_repo.find_by_id(user_id).await?
            .ok_or(DomainError::UserNotFound)?;

        if !caller.is_admin() && !caller.is(&user.id) {
            return Err(DomainError::Forbidden("cannot update another user's profile".into()));
        }

        // 2. Phone may only move to a number nobody else owns
        if let Some(owner) = self.user_repo.find_by_phone(&request.phone).await? {
            if owner.id != user.id {
                warn!("Update of user {} failed: phone already exists", user.id);
                return Err(DomainError::PhoneAlreadyExists(request.phone));
            }
        }

        if let Some(upload) = &image {
            upload.ensure_decodable()?;
        }

        // 3. Fields
        user.apply_profile(request.full_name, request.phone);

        // 4. Avatar replacement
        if let Some(upload) = image {
            if let Some(old) = &user.avatar {
                self.storage.delete(&old.storage_id).await?;
                info!("Deleted previous avatar {} of user {}", old.storage_id, user.id);
            }
            user.avatar = Some(self.store_avatar(&upload).await?);
        }

        // 5. Audit
        user.audit.stamp_update(caller.user_id);

        // 6. Role-specific persistence; the stored role picks the step
        match user.role {
            Role::Admin => self.update_admin(user).await,
            Role::Student => self.update_student(user).await,
            Role::Teacher => self.update_teacher(user).await,
        }
    }

    pub async fn get_all_users(&self, role: Role) -> Result<Vec<User>, DomainError> {
        self.user_repo.find_by_role(role).await
    }

    pub async fn get_user(&self, user_id: &Uuid) -> Result<User, DomainError> {
        self.user_repo.find_by_id(user_id).await?
            .ok_or(DomainError::UserNotFound)
    }

    async fn store_avatar(&self, upload: &ImageUpload) -> Result<Image, DomainError> {
        let stored = self.storage.upload(upload, AVATAR_FOLDER).await?;
        Ok(Image::from(stored))
    }

    async fn create_admin(&self, mut user: User) -> Result<User, DomainError> {
        user.role = Role::Admin;
        let created = self.user_repo.create(&user).await?;
        info!("Admin account created: {}", created.id);
        Ok(created)
    }

    async fn create_student(&self, mut user: User) -> Result<User, DomainError> {
        user.role = Role::Student;
        let created = self.user_repo.create(&user).await?;
        info!("Student account created: {}", created.id);
        Ok(created)
    }

    async fn create_teacher(&self, mut user: User) -> Result<User, DomainError> {
        user.role = Role::Teacher;
        let created = self.user_repo.create(&user).await?;
        info!("Teacher account created: {}", created.id);
        Ok(created)
    }

    async fn update_admin(&self, user: User) -> Result<User, DomainError> {
        let updated = self.user_repo.update(&user).await?;
        info!("Admin account updated: {}", updated.id);
        Ok(updated)
    }

    async fn update_student(&self, user: User) -> Result<User, DomainError> {
        let updated = self.user_repo.update(&user).await?;
        info!("Student account updated: {}", updated.id);
        Ok(updated)
    }

    async fn update_teacher(&self, user: User) -> Result<User, DomainError> {
        let updated = self.user_repo.update(&user).await?;
        info!("Teacher account updated: {}", updated.id);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;
    use crate::ports::{MockObjectStorage, StoredObject};
    use crate::repositories::MockUserRepository;

    struct PlainEncoder;

    impl PasswordEncoder for PlainEncoder {
        fn encode(&self, raw: &str) -> Result<String, DomainError> {
            Ok(format!("enc:{raw}"))
        }

        fn matches(&self, raw: &str, encoded: &str) -> Result<bool, DomainError> {
            Ok(encoded == format!("enc:{raw}"))
        }
    }

    fn png_upload() -> ImageUpload {
        let img = image::RgbImage::new(2, 2);
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        ImageUpload {
            file_name: "me.png".into(),
            content_type: Some("image/png".into()),
            bytes: buf.into_inner(),
        }
    }

    fn garbage_upload() -> ImageUpload {
        ImageUpload {
            file_name: "me.png".into(),
            content_type: Some("image/png".into()),
            bytes: b"%PDF-1.7 not an image".to_vec(),
        }
    }

    fn stored(id: &str) -> StoredObject {
        StoredObject {
            original_filename: "me.png".into(),
            url: format!("/uploads/avatars/{id}.png"),
            public_id: format!("avatars/{id}"),
        }
    }

    fn signup_request(enable: i32) -> CreateUser {
        CreateUser {
            email: "a@x.com".into(),
            phone: "+1555".into(),
            full_name: "Ada Lovelace".into(),
            password: "Secret123".into(),
            enable,
        }
    }

    fn existing(role: Role) -> User {
        User::new(
            "b@x.com".into(),
            "+1666".into(),
            "Bob".into(),
            "enc:Secret123".into(),
            true,
            role,
        )
    }

    fn service(users: MockUserRepository, storage: MockObjectStorage) -> UserService {
        UserService::new(Arc::new(users), Arc::new(storage), Arc::new(PlainEncoder))
    }

    #[tokio::test]
    async fn test_signup_creates_row_with_enable_flag() {
        for (flag, expected) in [(1, true), (0, false)] {
            let mut users = MockUserRepository::new();
            users.expect_find_by_email().returning(|_| Ok(None));
            users.expect_find_by_phone().returning(|_| Ok(None));
            users.expect_create().times(1).returning(|u| Ok(u.clone()));

            let user = service(users, MockObjectStorage::new())
                .create(&CallerContext::anonymous(), signup_request(flag), Role::Student, None)
                .await
                .unwrap();

            assert_eq!(user.email, "a@x.com");
            assert_eq!(user.phone, "+1555");
            assert_eq!(user.enabled, expected);
            assert_eq!(user.password, "enc:Secret123");
            assert_eq!(user.role, Role::Student);
            assert!(user.audit.created_by.is_none());
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_writes_nothing() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(Some(existing(Role::Student))));
        users.expect_find_by_phone().never();
        users.expect_create().never();

        let mut storage = MockObjectStorage::new();
        storage.expect_upload().never();

        let err = service(users, storage)
            .create(&CallerContext::anonymous(), signup_request(1), Role::Student, Some(png_upload()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmailAlreadyExists(ref e) if e == "a@x.com"));
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_find_by_phone().returning(|_| Ok(Some(existing(Role::Teacher))));
        users.expect_create().never();

        let err = service(users, MockObjectStorage::new())
            .create(&CallerContext::anonymous(), signup_request(1), Role::Teacher, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PhoneAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_create_with_avatar_and_creator_stamp() {
        let admin = CallerContext::authenticated(Uuid::new_v4(), Role::Admin);

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_find_by_phone().returning(|_| Ok(None));
        users.expect_create().times(1).returning(|u| Ok(u.clone()));

        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .withf(|_, folder| folder == AVATAR_FOLDER)
            .times(1)
            .returning(|_, _| Ok(stored("new")));

        let user = service(users, storage)
            .create(&admin, signup_request(1), Role::Teacher, Some(png_upload()))
            .await
            .unwrap();

        let avatar = user.avatar.expect("avatar attached");
        assert_eq!(avatar.storage_id, "avatars/new");
        assert_eq!(avatar.name, "me.png");
        assert_eq!(user.audit.created_by, admin.user_id);
        assert_eq!(user.role, Role::Teacher);
    }

    #[tokio::test]
    async fn test_create_with_invalid_image() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_find_by_phone().returning(|_| Ok(None));
        users.expect_create().never();

        let mut storage = MockObjectStorage::new();
        storage.expect_upload().never();

        let err = service(users, storage)
            .create(&CallerContext::anonymous(), signup_request(1), Role::Student, Some(garbage_upload()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ImageNotFound));
    }

    #[tokio::test]
    async fn test_anonymous_cannot_create_admin() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().never();
        users.expect_create().never();

        let err = service(users, MockObjectStorage::new())
            .create(&CallerContext::anonymous(), signup_request(1), Role::Admin, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_keeping_own_phone() {
        let target = existing(Role::Student);
        let target_id = target.id;
        let same = target.clone();
        let caller = CallerContext::authenticated(target_id, Role::Student);

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(target.clone())));
        users.expect_find_by_phone().returning(move |_| Ok(Some(same.clone())));
        users.expect_update().times(1).returning(|u| Ok(u.clone()));

        let updated = service(users, MockObjectStorage::new())
            .update(
                &caller,
                &target_id,
                UpdateUser { full_name: "Robert".into(), phone: "+1666".into() },
                None,
            )
            .await
            .unwrap();

        assert_eq!(updated.full_name, "Robert");
        assert_eq!(updated.phone, "+1666");
        assert_eq!(updated.audit.updated_by, Some(target_id));
        assert!(updated.audit.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_to_foreign_phone_rejected() {
        let target = existing(Role::Student);
        let target_id = target.id;
        let admin = CallerContext::authenticated(Uuid::new_v4(), Role::Admin);

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(target.clone())));
        users.expect_find_by_phone().returning(|_| Ok(Some(existing(Role::Teacher))));
        users.expect_update().never();

        let err = service(users, MockObjectStorage::new())
            .update(
                &admin,
                &target_id,
                UpdateUser { full_name: "Bob".into(), phone: "+1777".into() },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PhoneAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let admin = CallerContext::authenticated(Uuid::new_v4(), Role::Admin);
        let err = service(users, MockObjectStorage::new())
            .update(&admin, &Uuid::new_v4(), UpdateUser { full_name: "X".into(), phone: "+1".into() }, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound));
    }

    #[tokio::test]
    async fn test_update_other_user_forbidden_for_non_admin() {
        let target = existing(Role::Student);
        let target_id = target.id;

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(target.clone())));
        users.expect_update().never();

        let stranger = CallerContext::authenticated(Uuid::new_v4(), Role::Teacher);
        let err = service(users, MockObjectStorage::new())
            .update(&stranger, &target_id, UpdateUser { full_name: "X".into(), phone: "+1666".into() }, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_invalid_image_writes_nothing() {
        let mut target = existing(Role::Teacher);
        target.avatar = Some(Image::from(stored("old")));
        let target_id = target.id;
        let admin = CallerContext::authenticated(Uuid::new_v4(), Role::Admin);

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(target.clone())));
        users.expect_find_by_phone().returning(|_| Ok(None));
        users.expect_update().never();

        let mut storage = MockObjectStorage::new();
        storage.expect_delete().never();
        storage.expect_upload().never();

        let err = service(users, storage)
            .update(
                &admin,
                &target_id,
                UpdateUser { full_name: "New".into(), phone: "+1999".into() },
                Some(garbage_upload()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ImageNotFound));
    }

    #[tokio::test]
    async fn test_update_replaces_avatar_delete_first() {
        let mut target = existing(Role::Teacher);
        target.avatar = Some(Image::from(stored("old")));
        let target_id = target.id;
        let admin = CallerContext::authenticated(Uuid::new_v4(), Role::Admin);

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(target.clone())));
        users.expect_find_by_phone().returning(|_| Ok(None));
        users.expect_update().times(1).returning(|u| Ok(u.clone()));

        let mut seq = Sequence::new();
        let mut storage = MockObjectStorage::new();
        storage
            .expect_delete()
            .withf(|public_id| public_id == "avatars/old")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        storage
            .expect_upload()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(stored("new")));

        let updated = service(users, storage)
            .update(
                &admin,
                &target_id,
                UpdateUser { full_name: "Bob".into(), phone: "+1666".into() },
                Some(png_upload()),
            )
            .await
            .unwrap();
        assert_eq!(updated.avatar.unwrap().storage_id, "avatars/new");
    }

    #[tokio::test]
    async fn test_failed_upload_after_delete_is_not_compensated() {
        let mut target = existing(Role::Student);
        target.avatar = Some(Image::from(stored("old")));
        let target_id = target.id;

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(target.clone())));
        users.expect_find_by_phone().returning(|_| Ok(None));
        users.expect_update().never();

        let mut storage = MockObjectStorage::new();
        storage.expect_delete().times(1).returning(|_| Ok(()));
        storage
            .expect_upload()
            .times(1)
            .returning(|_, _| Err(DomainError::StorageError("bucket unavailable".into())));

        let caller = CallerContext::authenticated(target_id, Role::Student);
        let err = service(users, storage)
            .update(&caller, &target_id, UpdateUser { full_name: "Bob".into(), phone: "+1666".into() }, Some(png_upload()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::StorageError(_)));
    }

    #[tokio::test]
    async fn test_admin_update_keeps_stored_role() {
        for role in Role::ALL {
            let target = existing(role);
            let target_id = target.id;
            let admin = CallerContext::authenticated(Uuid::new_v4(), Role::Admin);

            let mut users = MockUserRepository::new();
            users.expect_find_by_id().returning(move |_| Ok(Some(target.clone())));
            users.expect_find_by_phone().returning(|_| Ok(None));
            users
                .expect_update()
                .withf(move |u| u.id == target_id && u.role == role)
                .times(1)
                .returning(|u| Ok(u.clone()));

            let updated = service(users, MockObjectStorage::new())
                .update(&admin, &target_id, UpdateUser { full_name: "Bobby".into(), phone: "+1667".into() }, None)
                .await
                .unwrap();
            assert_eq!(updated.role, role);
            assert_eq!(updated.audit.updated_by, admin.user_id);
        }
    }

    #[tokio::test]
    async fn test_get_all_users_filters_by_role() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_role()
            .withf(|role| *role == Role::Teacher)
            .times(1)
            .returning(|_| Ok(vec![existing(Role::Teacher)]));

        let all = service(users, MockObjectStorage::new()).get_all_users(Role::Teacher).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].role, Role::Teacher);
    }
}
