//! Unit tests for the market crate
//!
//! Use-case level tests run against in-memory repository doubles. The
//! product double keeps an operation log so the ordered-cascade
//! invariants are observable.

use std::sync::{Arc, Mutex};

use auth::application::config::AuthConfig;
use auth::application::{RegisterInput, RegisterUseCase, SignInInput, SignInUseCase};
use auth::domain::entity::session::Session;
use auth::domain::entity::user::{ProfileChanges, User};
use auth::domain::repository::{
    SessionRepository as AuthSessionRepository, UserRepository as AuthUserRepository,
};
use auth::domain::value_object::email::Email;
use auth::error::{AuthError, AuthResult};
use auth::{Identity, UserId};
use kernel::id::{CommentId, ProductId};
use uuid::Uuid;

use crate::application::{
    CreateCommentUseCase, CreateProductInput, CreateProductUseCase, CreateReplyUseCase,
    DeleteCommentUseCase, DeleteProductUseCase, ListProductsInput, ListProductsUseCase,
    ProductDetailUseCase, RemoveUserUseCase, ToggleLikeUseCase, UpdateProductInput,
    UpdateProductUseCase, UpdateStatusUseCase,
};
use crate::domain::comment_thread::CommentRecord;
use crate::domain::entity::comment::Comment;
use crate::domain::entity::product::{Product, ProductChanges as Changes, ProductImage};
use crate::domain::repository::{
    CommentRepository, LikeRepository, ModerationRepository, ProductFilter, ProductRepository,
    ProductSummary, SellerProfile,
};
use crate::domain::value_object::product_status::ProductStatus;
use crate::error::{MarketError, MarketResult};

// ============================================================================
// In-memory market store
// ============================================================================

#[derive(Clone, Default)]
struct MemoryMarketStore {
    inner: Arc<MarketInner>,
}

#[derive(Default)]
struct MarketInner {
    products: Mutex<Vec<Product>>,
    images: Mutex<Vec<ProductImage>>,
    likes: Mutex<Vec<(UserId, ProductId)>>,
    comments: Mutex<Vec<Comment>>,
    /// (user_id, public_id, display_name) - what the market queries of
    /// the users table would see
    users: Mutex<Vec<(UserId, String, String)>>,
    /// Mutating operations in execution order
    op_log: Mutex<Vec<String>>,
}

impl MemoryMarketStore {
    fn add_user(&self, user_id: UserId, public_id: &str, display_name: &str) {
        self.inner.users.lock().unwrap().push((
            user_id,
            public_id.to_string(),
            display_name.to_string(),
        ));
    }

    fn log(&self, op: &str) {
        self.inner.op_log.lock().unwrap().push(op.to_string());
    }

    fn ops(&self) -> Vec<String> {
        self.inner.op_log.lock().unwrap().clone()
    }

    fn clear_ops(&self) {
        self.inner.op_log.lock().unwrap().clear();
    }

    fn product_count(&self) -> usize {
        self.inner.products.lock().unwrap().len()
    }

    fn comment_count(&self) -> usize {
        self.inner.comments.lock().unwrap().len()
    }

    fn author_name_of(&self, user_id: &UserId) -> String {
        self.inner
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _, _)| id == user_id)
            .map(|(_, _, name)| name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

impl ProductRepository for MemoryMarketStore {
    async fn create_with_images(
        &self,
        product: &Product,
        image_paths: &[String],
    ) -> MarketResult<()> {
        self.log("insert_product");
        self.inner.products.lock().unwrap().push(product.clone());
        let mut images = self.inner.images.lock().unwrap();
        for (position, path) in image_paths.iter().enumerate() {
            images.push(ProductImage::new(
                product.product_id,
                path.clone(),
                position as i32,
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, product_id: &ProductId) -> MarketResult<Option<Product>> {
        Ok(self
            .inner
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.product_id == product_id)
            .cloned())
    }

    async fn images_for(&self, product_id: &ProductId) -> MarketResult<Vec<ProductImage>> {
        let mut images: Vec<ProductImage> = self
            .inner
            .images
            .lock()
            .unwrap()
            .iter()
            .filter(|i| &i.product_id == product_id)
            .cloned()
            .collect();
        images.sort_by_key(|i| i.position);
        Ok(images)
    }

    async fn search(
        &self,
        filter: &ProductFilter,
        caller: Option<&UserId>,
    ) -> MarketResult<Vec<ProductSummary>> {
        let products = self.inner.products.lock().unwrap();
        let likes = self.inner.likes.lock().unwrap();

        let mut matching: Vec<Product> = products
            .iter()
            .filter(|p| filter.category.is_none_or(|c| p.category == c))
            .filter(|p| filter.status.is_none_or(|s| p.status == s))
            .filter(|p| {
                filter
                    .keyword
                    .as_deref()
                    .is_none_or(|k| p.title.to_lowercase().contains(&k.to_lowercase()))
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .map(|product| {
                let like_count = likes
                    .iter()
                    .filter(|(_, pid)| *pid == product.product_id)
                    .count() as i64;
                let liked_by_caller = caller.is_some_and(|c| {
                    likes
                        .iter()
                        .any(|(uid, pid)| uid == c && *pid == product.product_id)
                });
                ProductSummary {
                    product,
                    thumbnail_path: None,
                    like_count,
                    liked_by_caller,
                }
            })
            .collect())
    }

    async fn update(
        &self,
        product_id: &ProductId,
        changes: &Changes,
    ) -> MarketResult<()> {
        let mut products = self.inner.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| &p.product_id == product_id)
            .ok_or(MarketError::ProductNotFound)?;
        changes.apply(product);

        if let Some(paths) = &changes.replace_images {
            let mut images = self.inner.images.lock().unwrap();
            images.retain(|i| &i.product_id != product_id);
            for (position, path) in paths.iter().enumerate() {
                images.push(ProductImage::new(*product_id, path.clone(), position as i32));
            }
        }
        Ok(())
    }

    async fn update_status(
        &self,
        product_id: &ProductId,
        status: ProductStatus,
    ) -> MarketResult<()> {
        let mut products = self.inner.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| &p.product_id == product_id)
            .ok_or(MarketError::ProductNotFound)?;
        product.status = status;
        Ok(())
    }

    async fn delete_with_dependents(&self, product_id: &ProductId) -> MarketResult<()> {
        self.log("delete_images");
        self.inner
            .images
            .lock()
            .unwrap()
            .retain(|i| &i.product_id != product_id);

        self.log("delete_likes");
        self.inner
            .likes
            .lock()
            .unwrap()
            .retain(|(_, pid)| pid != product_id);

        self.log("delete_comments");
        self.inner
            .comments
            .lock()
            .unwrap()
            .retain(|c| &c.product_id != product_id);

        self.log("delete_product");
        self.inner
            .products
            .lock()
            .unwrap()
            .retain(|p| &p.product_id != product_id);

        Ok(())
    }

    async fn seller_profile(&self, seller_id: &UserId) -> MarketResult<Option<SellerProfile>> {
        Ok(self
            .inner
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _, _)| id == seller_id)
            .map(|(_, public_id, display_name)| SellerProfile {
                public_id: public_id.clone(),
                display_name: display_name.clone(),
                campus: None,
                profile_image_path: None,
            }))
    }
}

impl LikeRepository for MemoryMarketStore {
    async fn toggle(&self, user_id: &UserId, product_id: &ProductId) -> MarketResult<bool> {
        let mut likes = self.inner.likes.lock().unwrap();
        let existing = likes
            .iter()
            .position(|(uid, pid)| uid == user_id && pid == product_id);
        match existing {
            Some(index) => {
                likes.remove(index);
                Ok(false)
            }
            None => {
                likes.push((*user_id, *product_id));
                Ok(true)
            }
        }
    }

    async fn count_for(&self, product_id: &ProductId) -> MarketResult<i64> {
        Ok(self
            .inner
            .likes
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, pid)| pid == product_id)
            .count() as i64)
    }

    async fn is_liked(&self, user_id: &UserId, product_id: &ProductId) -> MarketResult<bool> {
        Ok(self
            .inner
            .likes
            .lock()
            .unwrap()
            .iter()
            .any(|(uid, pid)| uid == user_id && pid == product_id))
    }
}

impl CommentRepository for MemoryMarketStore {
    async fn create(&self, comment: &Comment) -> MarketResult<()> {
        self.inner.comments.lock().unwrap().push(comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, comment_id: &CommentId) -> MarketResult<Option<Comment>> {
        Ok(self
            .inner
            .comments
            .lock()
            .unwrap()
            .iter()
            .find(|c| &c.comment_id == comment_id)
            .cloned())
    }

    async fn list_for_product(
        &self,
        product_id: &ProductId,
    ) -> MarketResult<Vec<CommentRecord>> {
        let mut comments: Vec<Comment> = self
            .inner
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.product_id == product_id)
            .cloned()
            .collect();
        // Top-level first, then by creation time - the shape the SQL
        // ordering produces
        comments.sort_by(|a, b| {
            a.parent_id
                .is_some()
                .cmp(&b.parent_id.is_some())
                .then(a.created_at.cmp(&b.created_at))
        });

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author_name = self.author_name_of(&comment.user_id);
                CommentRecord {
                    comment,
                    author_name,
                    author_image_path: None,
                }
            })
            .collect())
    }

    async fn delete_with_replies(&self, comment_id: &CommentId) -> MarketResult<u64> {
        self.log("delete_replies");
        let mut comments = self.inner.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| c.parent_id != Some(*comment_id));
        self.log("delete_comment");
        comments.retain(|c| &c.comment_id != comment_id);
        Ok((before - comments.len()) as u64)
    }
}

impl ModerationRepository for MemoryMarketStore {
    async fn find_user_by_public_id(&self, public_id: &str) -> MarketResult<Option<UserId>> {
        Ok(self
            .inner
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(_, pid, _)| pid == public_id)
            .map(|(id, _, _)| *id))
    }

    async fn delete_user_with_content(&self, user_id: &UserId) -> MarketResult<()> {
        let owned: Vec<ProductId> = self
            .inner
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| &p.seller_id == user_id)
            .map(|p| p.product_id)
            .collect();

        for product_id in &owned {
            self.delete_with_dependents(product_id).await?;
        }

        self.inner
            .likes
            .lock()
            .unwrap()
            .retain(|(uid, _)| uid != user_id);

        let mut comments = self.inner.comments.lock().unwrap();
        let theirs: Vec<CommentId> = comments
            .iter()
            .filter(|c| &c.user_id == user_id)
            .map(|c| c.comment_id)
            .collect();
        comments.retain(|c| {
            c.parent_id.is_none_or(|p| !theirs.contains(&p)) && &c.user_id != user_id
        });
        drop(comments);

        self.inner
            .users
            .lock()
            .unwrap()
            .retain(|(id, _, _)| id != user_id);

        Ok(())
    }
}

// ============================================================================
// In-memory auth store (for the end-to-end scenario)
// ============================================================================

#[derive(Clone, Default)]
struct MemoryAuthStore {
    inner: Arc<AuthInner>,
}

#[derive(Default)]
struct AuthInner {
    users: Mutex<Vec<User>>,
    sessions: Mutex<Vec<Session>>,
}

impl AuthUserRepository for MemoryAuthStore {
    async fn create(&self, user: &User) -> AuthResult<()> {
        self.inner.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self
            .inner
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.user_id == user_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .inner
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self
            .inner
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.email == *email))
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> AuthResult<()> {
        let mut users = self.inner.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| &u.user_id == user_id)
            .ok_or(AuthError::UserNotFound)?;
        changes.apply(user);
        Ok(())
    }
}

impl AuthSessionRepository for MemoryAuthStore {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        self.inner.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<Session>> {
        Ok(self
            .inner
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.session_id == session_id)
            .cloned())
    }

    async fn update_activity(&self, _session: &Session) -> AuthResult<()> {
        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        self.inner
            .sessions
            .lock()
            .unwrap()
            .retain(|s| s.session_id != session_id);
        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> AuthResult<u64> {
        let mut sessions = self.inner.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| &s.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        Ok(0)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn member(store: &MemoryMarketStore, name: &str) -> Identity {
    let identity = Identity {
        user_id: UserId::new(),
        is_admin: false,
    };
    store.add_user(identity.user_id, &format!("pub-{}", name), name);
    identity
}

fn admin(store: &MemoryMarketStore, name: &str) -> Identity {
    let identity = Identity {
        user_id: UserId::new(),
        is_admin: true,
    };
    store.add_user(identity.user_id, &format!("pub-{}", name), name);
    identity
}

fn product_input(title: &str, price: &str) -> CreateProductInput {
    CreateProductInput {
        title: title.to_string(),
        price: price.to_string(),
        category: "Electronics".to_string(),
        description: "Barely used".to_string(),
        location: Some("Student union".to_string()),
        image_paths: vec!["/uploads/one.jpg".to_string()],
    }
}

async fn listed_product(
    store: &Arc<MemoryMarketStore>,
    seller: &Identity,
) -> ProductId {
    CreateProductUseCase::new(store.clone())
        .execute(Some(seller), product_input("MacBook Air", "10000"))
        .await
        .expect("listing should be created")
}

// ============================================================================
// Likes
// ============================================================================

mod likes {
    use super::*;

    #[tokio::test]
    async fn double_toggle_restores_prior_count() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let buyer = member(&store, "buyer");
        let product_id = listed_product(&store, &seller).await;

        let use_case = ToggleLikeUseCase::new(store.clone(), store.clone());

        let before = LikeRepository::count_for(store.as_ref(), &product_id)
            .await
            .unwrap();

        let first = use_case.execute(Some(&buyer), &product_id).await.unwrap();
        assert!(first.liked);
        assert_eq!(first.like_count, before + 1);

        let second = use_case.execute(Some(&buyer), &product_id).await.unwrap();
        assert!(!second.liked);
        assert_eq!(second.like_count, before);
    }

    #[tokio::test]
    async fn anonymous_toggle_is_unauthenticated() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let product_id = listed_product(&store, &seller).await;

        let result = ToggleLikeUseCase::new(store.clone(), store.clone())
            .execute(None, &product_id)
            .await;
        assert!(matches!(result, Err(MarketError::Unauthenticated)));
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let store = Arc::new(MemoryMarketStore::default());
        let buyer = member(&store, "buyer");

        let result = ToggleLikeUseCase::new(store.clone(), store.clone())
            .execute(Some(&buyer), &ProductId::new())
            .await;
        assert!(matches!(result, Err(MarketError::ProductNotFound)));
    }
}

// ============================================================================
// Status transitions
// ============================================================================

mod status {
    use super::*;

    #[tokio::test]
    async fn sold_alias_is_stored_as_sold_out() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let product_id = listed_product(&store, &seller).await;

        let stored = UpdateStatusUseCase::new(store.clone())
            .execute(Some(&seller), &product_id, "SOLD")
            .await
            .unwrap();

        assert_eq!(stored, ProductStatus::SoldOut);

        let product = ProductRepository::find_by_id(store.as_ref(), &product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.status, ProductStatus::SoldOut);
        assert_eq!(product.status.code(), "SOLD_OUT");
    }

    #[tokio::test]
    async fn non_seller_is_forbidden_and_status_unchanged() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let stranger = member(&store, "stranger");
        let product_id = listed_product(&store, &seller).await;

        let result = UpdateStatusUseCase::new(store.clone())
            .execute(Some(&stranger), &product_id, "RESERVED")
            .await;
        assert!(matches!(result, Err(MarketError::Forbidden)));

        let product = ProductRepository::find_by_id(store.as_ref(), &product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.status, ProductStatus::ForSale);
    }

    #[tokio::test]
    async fn unknown_status_is_invalid() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let product_id = listed_product(&store, &seller).await;

        let result = UpdateStatusUseCase::new(store.clone())
            .execute(Some(&seller), &product_id, "DELETED")
            .await;
        assert!(matches!(result, Err(MarketError::InvalidStatus)));
    }

    #[tokio::test]
    async fn any_status_reachable_from_any_other() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let product_id = listed_product(&store, &seller).await;
        let use_case = UpdateStatusUseCase::new(store.clone());

        for status in ["SOLD_OUT", "FOR_SALE", "RESERVED", "FOR_SALE"] {
            use_case
                .execute(Some(&seller), &product_id, status)
                .await
                .unwrap();
        }

        let product = ProductRepository::find_by_id(store.as_ref(), &product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.status, ProductStatus::ForSale);
    }
}

// ============================================================================
// Listings
// ============================================================================

mod listings {
    use super::*;

    #[tokio::test]
    async fn create_rejects_bad_input() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let use_case = CreateProductUseCase::new(store.clone());

        let mut input = product_input("MacBook", "-100");
        assert!(matches!(
            use_case.execute(Some(&seller), input).await,
            Err(MarketError::Validation(_))
        ));

        input = product_input("MacBook", "cheap");
        assert!(matches!(
            use_case.execute(Some(&seller), input).await,
            Err(MarketError::Validation(_))
        ));

        input = product_input("MacBook", "1000");
        input.category = "Vehicles".to_string();
        assert!(matches!(
            use_case.execute(Some(&seller), input).await,
            Err(MarketError::Validation(_))
        ));

        input = product_input("   ", "1000");
        assert!(matches!(
            use_case.execute(Some(&seller), input).await,
            Err(MarketError::Validation(_))
        ));

        assert!(matches!(
            use_case.execute(None, product_input("MacBook", "1000")).await,
            Err(MarketError::Unauthenticated)
        ));

        assert_eq!(store.product_count(), 0);
    }

    #[tokio::test]
    async fn price_string_is_parsed_to_integer() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let product_id = listed_product(&store, &seller).await;

        let product = ProductRepository::find_by_id(store.as_ref(), &product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.price.value(), 10000);
    }

    #[tokio::test]
    async fn search_filters_and_paginates() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let use_case = CreateProductUseCase::new(store.clone());

        for i in 0..3 {
            use_case
                .execute(Some(&seller), product_input(&format!("MacBook {}", i), "1000"))
                .await
                .unwrap();
        }
        let mut book = product_input("Calculus textbook", "200");
        book.category = "Books".to_string();
        use_case.execute(Some(&seller), book).await.unwrap();

        let list = ListProductsUseCase::new(store.clone());

        let electronics = list
            .execute(
                None,
                ListProductsInput {
                    category: Some("Electronics".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(electronics.len(), 3);

        let keyword = list
            .execute(
                None,
                ListProductsInput {
                    keyword: Some("textbook".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(keyword.len(), 1);
        assert_eq!(keyword[0].product.title, "Calculus textbook");

        let page_two = list
            .execute(
                None,
                ListProductsInput {
                    page: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(page_two.is_empty());

        let unknown = list
            .execute(
                None,
                ListProductsInput {
                    category: Some("Vehicles".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(unknown, Err(MarketError::Validation(_))));
    }

    #[tokio::test]
    async fn edit_is_seller_only_and_partial() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let stranger = member(&store, "stranger");
        let product_id = listed_product(&store, &seller).await;

        let use_case = UpdateProductUseCase::new(store.clone());

        let result = use_case
            .execute(
                Some(&stranger),
                &product_id,
                UpdateProductInput {
                    title: Some("Hijacked".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(MarketError::Forbidden)));

        use_case
            .execute(
                Some(&seller),
                &product_id,
                UpdateProductInput {
                    price: Some("9000".to_string()),
                    location: Some("".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let product = ProductRepository::find_by_id(store.as_ref(), &product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.title, "MacBook Air");
        assert_eq!(product.price.value(), 9000);
        assert!(product.location.is_none());
    }

    #[tokio::test]
    async fn deletion_removes_dependents_in_fixed_order() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let buyer = member(&store, "buyer");
        let product_id = listed_product(&store, &seller).await;

        ToggleLikeUseCase::new(store.clone(), store.clone())
            .execute(Some(&buyer), &product_id)
            .await
            .unwrap();
        CreateCommentUseCase::new(store.clone(), store.clone())
            .execute(Some(&buyer), &product_id, "Still available?")
            .await
            .unwrap();

        store.clear_ops();
        DeleteProductUseCase::new(store.clone())
            .execute(Some(&seller), &product_id)
            .await
            .unwrap();

        assert_eq!(
            store.ops(),
            vec![
                "delete_images".to_string(),
                "delete_likes".to_string(),
                "delete_comments".to_string(),
                "delete_product".to_string(),
            ]
        );
        assert_eq!(store.product_count(), 0);
        assert_eq!(store.comment_count(), 0);
    }

    #[tokio::test]
    async fn bystander_cannot_delete_but_admin_can() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let bystander = member(&store, "bystander");
        let root = admin(&store, "root");
        let product_id = listed_product(&store, &seller).await;

        let use_case = DeleteProductUseCase::new(store.clone());

        let result = use_case.execute(Some(&bystander), &product_id).await;
        assert!(matches!(result, Err(MarketError::Forbidden)));
        assert_eq!(store.product_count(), 1);

        use_case.execute(Some(&root), &product_id).await.unwrap();
        assert_eq!(store.product_count(), 0);
    }
}

// ============================================================================
// Comments
// ============================================================================

mod comments {
    use super::*;

    #[tokio::test]
    async fn empty_content_is_rejected() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let buyer = member(&store, "buyer");
        let product_id = listed_product(&store, &seller).await;

        let result = CreateCommentUseCase::new(store.clone(), store.clone())
            .execute(Some(&buyer), &product_id, "   ")
            .await;
        assert!(matches!(result, Err(MarketError::Validation(_))));
        assert_eq!(store.comment_count(), 0);
    }

    #[tokio::test]
    async fn reply_must_stay_on_the_same_product() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let buyer = member(&store, "buyer");
        let first = listed_product(&store, &seller).await;
        let second = listed_product(&store, &seller).await;

        let comment_id = CreateCommentUseCase::new(store.clone(), store.clone())
            .execute(Some(&buyer), &first, "Still available?")
            .await
            .unwrap();

        let result = CreateReplyUseCase::new(store.clone(), store.clone())
            .execute(Some(&seller), &second, &comment_id, "Yes")
            .await;
        assert!(matches!(result, Err(MarketError::Validation(_))));

        let ok = CreateReplyUseCase::new(store.clone(), store.clone())
            .execute(Some(&seller), &first, &comment_id, "Yes")
            .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn non_author_delete_returns_false_and_removes_nothing() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let buyer = member(&store, "buyer");
        let product_id = listed_product(&store, &seller).await;

        let comment_id = CreateCommentUseCase::new(store.clone(), store.clone())
            .execute(Some(&buyer), &product_id, "Still available?")
            .await
            .unwrap();

        let deleted = DeleteCommentUseCase::new(store.clone())
            .execute(Some(&seller), &comment_id)
            .await
            .unwrap();

        assert!(!deleted);
        assert_eq!(store.comment_count(), 1);
    }

    #[tokio::test]
    async fn author_delete_removes_comment_and_replies() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let buyer = member(&store, "buyer");
        let product_id = listed_product(&store, &seller).await;

        let comment_id = CreateCommentUseCase::new(store.clone(), store.clone())
            .execute(Some(&buyer), &product_id, "Still available?")
            .await
            .unwrap();
        CreateReplyUseCase::new(store.clone(), store.clone())
            .execute(Some(&seller), &product_id, &comment_id, "Yes")
            .await
            .unwrap();

        let deleted = DeleteCommentUseCase::new(store.clone())
            .execute(Some(&buyer), &comment_id)
            .await
            .unwrap();

        assert!(deleted);
        assert_eq!(store.comment_count(), 0);
    }

    #[tokio::test]
    async fn detail_threads_comments_with_authors() {
        let store = Arc::new(MemoryMarketStore::default());
        let seller = member(&store, "seller");
        let buyer = member(&store, "buyer");
        let product_id = listed_product(&store, &seller).await;

        let comment_id = CreateCommentUseCase::new(store.clone(), store.clone())
            .execute(Some(&buyer), &product_id, "Still available?")
            .await
            .unwrap();
        CreateReplyUseCase::new(store.clone(), store.clone())
            .execute(Some(&seller), &product_id, &comment_id, "Yes, it is")
            .await
            .unwrap();

        let detail = ProductDetailUseCase::new(store.clone(), store.clone(), store.clone())
            .execute(Some(&buyer), &product_id)
            .await
            .unwrap();

        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].author_name, "buyer");
        assert_eq!(detail.comments[0].replies.len(), 1);
        assert_eq!(detail.comments[0].replies[0].author_name, "seller");
    }
}

// ============================================================================
// Moderation
// ============================================================================

mod moderation {
    use super::*;

    #[tokio::test]
    async fn remove_user_requires_admin() {
        let store = Arc::new(MemoryMarketStore::default());
        let _target = member(&store, "target");
        let bystander = member(&store, "bystander");

        let result = RemoveUserUseCase::new(store.clone())
            .execute(Some(&bystander), "pub-target")
            .await;
        assert!(matches!(result, Err(MarketError::Forbidden)));

        let result = RemoveUserUseCase::new(store.clone())
            .execute(None, "pub-target")
            .await;
        assert!(matches!(result, Err(MarketError::Unauthenticated)));
    }

    #[tokio::test]
    async fn remove_user_takes_their_content_along() {
        let store = Arc::new(MemoryMarketStore::default());
        let target = member(&store, "target");
        let other = member(&store, "other");
        let root = admin(&store, "root");

        let product_id = listed_product(&store, &target).await;
        CreateCommentUseCase::new(store.clone(), store.clone())
            .execute(Some(&other), &product_id, "Interested")
            .await
            .unwrap();
        ToggleLikeUseCase::new(store.clone(), store.clone())
            .execute(Some(&other), &product_id)
            .await
            .unwrap();

        RemoveUserUseCase::new(store.clone())
            .execute(Some(&root), "pub-target")
            .await
            .unwrap();

        assert_eq!(store.product_count(), 0);
        assert_eq!(store.comment_count(), 0);
        assert!(
            ModerationRepository::find_user_by_public_id(store.as_ref(), "pub-target")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn missing_target_is_not_found() {
        let store = Arc::new(MemoryMarketStore::default());
        let root = admin(&store, "root");

        let result = RemoveUserUseCase::new(store.clone())
            .execute(Some(&root), "pub-nobody")
            .await;
        assert!(matches!(result, Err(MarketError::UserNotFound)));
    }
}

// ============================================================================
// End-to-end scenario
// ============================================================================

mod scenario {
    use super::*;

    /// register -> sign in -> list a product -> another user likes it ->
    /// seller reserves it -> seller deletes it -> detail is gone
    #[tokio::test]
    async fn full_marketplace_flow() {
        let auth_store = Arc::new(MemoryAuthStore::default());
        let market_store = Arc::new(MemoryMarketStore::default());
        let config = Arc::new(AuthConfig::development());

        // Register both users
        let register = RegisterUseCase::new(auth_store.clone());
        for (email, name) in [("alice@example.com", "Alice"), ("bob@example.com", "Bob")] {
            register
                .execute(RegisterInput {
                    email: email.to_string(),
                    password: "a-valid-password".to_string(),
                    password_confirm: "a-valid-password".to_string(),
                    display_name: name.to_string(),
                    campus: None,
                })
                .await
                .unwrap();
        }

        // Alice signs in
        SignInUseCase::new(auth_store.clone(), auth_store.clone(), config.clone())
            .execute(SignInInput {
                email: "alice@example.com".to_string(),
                password: "a-valid-password".to_string(),
            })
            .await
            .unwrap();

        // Resolve identities the way the middleware would
        let identity_for = |email: &str| {
            let users = auth_store.inner.users.lock().unwrap();
            let user = users
                .iter()
                .find(|u| u.email.as_str() == email)
                .expect("registered");
            market_store.add_user(user.user_id, user.public_id.as_str(), user.display_name.as_str());
            Identity::from(user)
        };
        let alice = identity_for("alice@example.com");
        let bob = identity_for("bob@example.com");

        // Alice lists a product
        let product_id = CreateProductUseCase::new(market_store.clone())
            .execute(
                Some(&alice),
                CreateProductInput {
                    title: "Desk lamp".to_string(),
                    price: "10000".to_string(),
                    category: "Electronics".to_string(),
                    description: "Warm light".to_string(),
                    location: None,
                    image_paths: vec![],
                },
            )
            .await
            .unwrap();

        // Bob likes it
        let outcome = ToggleLikeUseCase::new(market_store.clone(), market_store.clone())
            .execute(Some(&bob), &product_id)
            .await
            .unwrap();
        assert!(outcome.liked);
        assert_eq!(outcome.like_count, 1);

        // Alice reserves it
        let status = UpdateStatusUseCase::new(market_store.clone())
            .execute(Some(&alice), &product_id, "RESERVED")
            .await
            .unwrap();
        assert_eq!(status, ProductStatus::Reserved);

        // Alice deletes it
        DeleteProductUseCase::new(market_store.clone())
            .execute(Some(&alice), &product_id)
            .await
            .unwrap();

        // The detail page now reports NotFound
        let detail = ProductDetailUseCase::new(
            market_store.clone(),
            market_store.clone(),
            market_store.clone(),
        )
        .execute(Some(&bob), &product_id)
        .await;
        assert!(matches!(detail, Err(MarketError::ProductNotFound)));
    }
}
