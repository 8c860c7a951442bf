//! Transient state of the create / edit form.
//!
//! ```text
//! Empty -> Editing -> Submitting -> Closed      (success)
//!                            \---> Editing     (failure)
//! Empty | Editing -> Closed                     (cancel)
//! ```
//!
//! While editing the image moves through `NoImage -> Uploading -> HasImage`,
//! falling back to whatever it held before when an upload fails. Only one
//! upload or submission can be in flight at a time.
//!
//! The API builds one form per request: prompt writes run the submit half and
//! `POST /images` runs the upload half. `cancel` is for callers that hold a
//! form across interactions, such as a dialog being dismissed.

use chrono::{DateTime, Utc};

use crate::prompt::{AiProvider, Category, Prompt, PromptFormData};

/// 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    MissingRequiredField,
    #[error("Please upload an image file (got {content_type})")]
    NotAnImage { content_type: String },
    #[error("Image must be 5MB or smaller (got {size} bytes)")]
    TooLarge { size: usize },
    #[error("Image must be 5MB or smaller")]
    UploadTooLarge,
    #[error("Please choose a file to upload")]
    NoFile,
    #[error("Another request is still in progress")]
    Busy,
    #[error("The form is closed")]
    Closed,
    #[error("No {0} is in progress")]
    NotInFlight(&'static str),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FormState {
    Empty,
    Editing,
    Submitting,
    Closed,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ImageState {
    NoImage,
    Uploading { previous: Option<String> },
    HasImage(String),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

#[derive(Debug, Clone)]
pub struct PromptForm {
    mode: FormMode,
    state: FormState,
    image: ImageState,
    title: String,
    content: String,
    description: Option<String>,
    category: Category,
    ai_provider: AiProvider,
}

impl PromptForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            state: FormState::Empty,
            image: ImageState::NoImage,
            title: String::new(),
            content: String::new(),
            description: None,
            category: Category::Work,
            ai_provider: AiProvider::OpenAi,
        }
    }

    pub fn edit(prompt: &Prompt) -> Self {
        Self {
            mode: FormMode::Edit {
                id: prompt.id.clone(),
            },
            state: FormState::Editing,
            image: match &prompt.image_url {
                Some(url) => ImageState::HasImage(url.clone()),
                None => ImageState::NoImage,
            },
            title: prompt.title.clone(),
            content: prompt.content.clone(),
            description: prompt.description.clone(),
            category: prompt.category,
            ai_provider: prompt.ai_provider,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn image(&self) -> &ImageState {
        &self.image
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Controls are disabled while an upload or submission is in flight.
    pub fn is_busy(&self) -> bool {
        self.state == FormState::Submitting
            || matches!(self.image, ImageState::Uploading { .. })
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), FormError> {
        self.touch()?;
        self.title = title.into();
        Ok(())
    }

    pub fn set_content(
        &mut self,
        content: impl Into<String>,
    ) -> Result<(), FormError> {
        self.touch()?;
        self.content = content.into();
        Ok(())
    }

    pub fn set_description(
        &mut self,
        description: Option<String>,
    ) -> Result<(), FormError> {
        self.touch()?;
        self.description = description;
        Ok(())
    }

    pub fn set_category(&mut self, category: Category) -> Result<(), FormError> {
        self.touch()?;
        self.category = category;
        Ok(())
    }

    pub fn set_ai_provider(
        &mut self,
        ai_provider: AiProvider,
    ) -> Result<(), FormError> {
        self.touch()?;
        self.ai_provider = ai_provider;
        Ok(())
    }

    /// Points the form at an image that is already stored.
    pub fn attach_image(&mut self, url: impl Into<String>) -> Result<(), FormError> {
        self.ensure_idle()?;
        self.touch()?;
        self.image = ImageState::HasImage(url.into());
        Ok(())
    }

    pub fn clear_image(&mut self) -> Result<(), FormError> {
        self.ensure_idle()?;
        self.touch()?;
        self.image = ImageState::NoImage;
        Ok(())
    }

    /// Validates `file` and enters `Uploading`. Nothing changes when the file
    /// is rejected.
    pub fn begin_upload(&mut self, file: &ImageFile) -> Result<(), FormError> {
        self.ensure_open()?;
        self.ensure_idle()?;
        file.validate()?;
        self.touch()?;

        let previous = match &self.image {
            ImageState::HasImage(url) => Some(url.clone()),
            _ => None,
        };
        self.image = ImageState::Uploading { previous };
        Ok(())
    }

    /// Replaces any previous preview with the uploaded image.
    pub fn finish_upload(&mut self, url: impl Into<String>) -> Result<(), FormError> {
        let ImageState::Uploading { .. } = self.image else {
            return Err(FormError::NotInFlight("upload"));
        };
        self.image = ImageState::HasImage(url.into());
        Ok(())
    }

    pub fn fail_upload(&mut self) -> Result<(), FormError> {
        let previous = match &mut self.image {
            ImageState::Uploading { previous } => previous.take(),
            _ => return Err(FormError::NotInFlight("upload")),
        };
        self.image = match previous {
            Some(url) => ImageState::HasImage(url),
            None => ImageState::NoImage,
        };
        Ok(())
    }

    /// Validates the fields and enters `Submitting`, returning the payload to
    /// store. The image is dropped unless the category is Art.
    pub fn begin_submit(&mut self) -> Result<PromptFormData, FormError> {
        self.ensure_open()?;
        self.ensure_idle()?;
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(FormError::MissingRequiredField);
        }

        self.state = FormState::Submitting;
        Ok(self.payload())
    }

    pub fn submit_succeeded(&mut self) -> Result<(), FormError> {
        self.finish_submit(FormState::Closed)
    }

    pub fn submit_failed(&mut self) -> Result<(), FormError> {
        self.finish_submit(FormState::Editing)
    }

    pub fn cancel(&mut self) -> Result<(), FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::Busy);
        }
        self.state = FormState::Closed;
        Ok(())
    }

    fn payload(&self) -> PromptFormData {
        let image_url = match (&self.image, self.category.allows_image()) {
            (ImageState::HasImage(url), true) => Some(url.clone()),
            _ => None,
        };

        PromptFormData {
            title: self.title.clone(),
            content: self.content.clone(),
            description: self
                .description
                .clone()
                .filter(|d| !d.trim().is_empty()),
            category: self.category,
            ai_provider: self.ai_provider,
            image_url,
        }
    }

    fn finish_submit(&mut self, next: FormState) -> Result<(), FormError> {
        if self.state != FormState::Submitting {
            return Err(FormError::NotInFlight("submission"));
        }
        self.state = next;
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), FormError> {
        match self.state {
            FormState::Closed => Err(FormError::Closed),
            _ => Ok(()),
        }
    }

    fn ensure_idle(&self) -> Result<(), FormError> {
        if self.is_busy() {
            return Err(FormError::Busy);
        }
        Ok(())
    }

    fn touch(&mut self) -> Result<(), FormError> {
        match self.state {
            FormState::Closed => Err(FormError::Closed),
            FormState::Submitting => Err(FormError::Busy),
            FormState::Empty => {
                self.state = FormState::Editing;
                Ok(())
            }
            FormState::Editing => Ok(()),
        }
    }
}

/// A file picked for upload, described before any bytes leave the process.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub size: usize,
}

impl ImageFile {
    pub fn validate(&self) -> Result<(), FormError> {
        if !self.content_type.to_ascii_lowercase().starts_with("image/") {
            return Err(FormError::NotAnImage {
                content_type: self.content_type.clone(),
            });
        }
        if self.size > MAX_IMAGE_BYTES {
            return Err(FormError::TooLarge { size: self.size });
        }
        Ok(())
    }

    /// `{unix millis}-{sanitized name}`
    pub fn storage_path(&self, now: DateTime<Utc>) -> String {
        format!(
            "{}-{}",
            now.timestamp_millis(),
            sanitize_file_name(&self.name)
        )
    }
}

/// Keeps ASCII alphanumerics, `.`, `-` and `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(*c, '.' | '-' | '_'))
        .collect();

    if sanitized.is_empty() {
        "image".to_string()
    } else {
        sanitized
    }
}
