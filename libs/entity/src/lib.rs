pub mod filter;
pub mod form;
pub mod prompt;
pub mod user;

pub mod prelude {
    pub use crate::filter::{CategoryFilter, PromptFilter};
    pub use crate::form::{
        FormError, FormMode, FormState, ImageFile, ImageState, PromptForm,
    };
    pub use crate::prompt::{
        AiProvider, Category, Prompt as PromptEntity, PromptFormData,
    };
    pub use crate::user::{Session, User as UserEntity};
}
