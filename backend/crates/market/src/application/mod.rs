pub mod comments;
pub mod create_product;
pub mod delete_product;
pub mod list_products;
pub mod moderation;
pub mod product_detail;
pub mod toggle_like;
pub mod update_product;
pub mod update_status;

pub use comments::{CreateCommentUseCase, CreateReplyUseCase, DeleteCommentUseCase};
pub use create_product::{CreateProductInput, CreateProductUseCase};
pub use delete_product::DeleteProductUseCase;
pub use list_products::{ListProductsInput, ListProductsUseCase, PAGE_SIZE};
pub use moderation::RemoveUserUseCase;
pub use product_detail::{ProductDetail, ProductDetailUseCase};
pub use toggle_like::{LikeOutcome, ToggleLikeUseCase};
pub use update_product::{UpdateProductInput, UpdateProductUseCase};
pub use update_status::UpdateStatusUseCase;
