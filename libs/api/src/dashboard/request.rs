use std::str::FromStr;

use anyhow::Context;
use entity::prelude::*;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetDashboardParam {
    /// `All`, `Work`, `Personal` or `Art`
    pub category: Option<String>,
    /// Case-insensitive search on title and content
    pub q: Option<String>,
}

impl GetDashboardParam {
    pub fn filter(&self) -> anyhow::Result<PromptFilter> {
        let category = match self.category.as_deref() {
            None | Some("") => CategoryFilter::All,
            Some(category) => CategoryFilter::from_str(category)
                .with_context(|| category.to_string())?,
        };

        Ok(PromptFilter::new(category, self.q.clone().unwrap_or_default()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_filter_defaults_to_all() {
        // Arrange
        let params = GetDashboardParam {
            category: None,
            q: None,
        };

        // Act
        let filter = params.filter().unwrap();

        // Assert
        assert_eq!(filter, PromptFilter::default());
    }

    #[test]
    fn test_filter_parses_category() {
        // Arrange
        let params = GetDashboardParam {
            category: Some("Art".to_string()),
            q: Some("sunset".to_string()),
        };

        // Act
        let filter = params.filter().unwrap();

        // Assert
        assert_eq!(
            filter,
            PromptFilter::new(CategoryFilter::Only(Category::Art), "sunset")
        );
    }

    #[test]
    fn test_filter_unknown_category() {
        // Arrange
        let params = GetDashboardParam {
            category: Some("Music".to_string()),
            q: None,
        };

        // Act
        let result = params.filter();

        // Assert
        assert_eq!(result.unwrap_err().to_string(), "Music");
    }
}
