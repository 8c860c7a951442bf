use std::fmt;
use std::str::FromStr;

use strum::IntoEnumIterator;

use crate::prompt::{Category, Prompt};

/// Category selector of the list view.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Every selectable option, `All` first.
    pub fn options() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::iter().map(CategoryFilter::Only))
            .collect()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => write!(f, "{}", category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            return Ok(CategoryFilter::All);
        }
        Category::from_str(s).map(CategoryFilter::Only)
    }
}

#[derive(Debug, Default, PartialEq, Clone)]
pub struct PromptFilter {
    pub category: CategoryFilter,
    pub query: String,
}

impl PromptFilter {
    pub fn new(category: CategoryFilter, query: impl Into<String>) -> Self {
        Self {
            category,
            query: query.into(),
        }
    }

    pub fn matches(&self, prompt: &Prompt) -> bool {
        let in_category = match self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => prompt.category == category,
        };
        if !in_category {
            return false;
        }
        if self.query.is_empty() {
            return true;
        }

        let query = self.query.to_lowercase();
        prompt.title.to_lowercase().contains(&query)
            || prompt.content.to_lowercase().contains(&query)
    }

    /// The visible subset of `prompts`, source order preserved.
    pub fn apply<'a>(&self, prompts: &'a [Prompt]) -> Vec<&'a Prompt> {
        prompts.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn prompt(id: &str, category: Category, title: &str, content: &str) -> Prompt {
        Prompt {
            id: id.to_string(),
            category,
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    fn fixtures() -> Vec<Prompt> {
        vec![
            prompt("1", Category::Work, "Daily standup", "Summarize yesterday"),
            prompt("2", Category::Personal, "Meal plan", "Plan a WEEK of dinners"),
            prompt("3", Category::Art, "Sunset", "Oil painting of a harbor"),
            prompt("4", Category::Work, "Weekly report", "List the week's wins"),
        ]
    }

    fn ids(prompts: Vec<&Prompt>) -> Vec<&str> {
        prompts.into_iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_all_without_query_shows_everything() {
        let prompts = fixtures();

        let visible = PromptFilter::default().apply(&prompts);

        assert_eq!(ids(visible), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_category_only() {
        let prompts = fixtures();
        let filter = PromptFilter::new(CategoryFilter::Only(Category::Work), "");

        let visible = filter.apply(&prompts);

        assert_eq!(ids(visible), vec!["1", "4"]);
    }

    #[test]
    fn test_query_is_case_insensitive_over_title_and_content() {
        let prompts = fixtures();
        let filter = PromptFilter::new(CategoryFilter::All, "week");

        let visible = filter.apply(&prompts);

        // "WEEK" in content of 2, "Weekly" in title of 4
        assert_eq!(ids(visible), vec!["2", "4"]);
    }

    #[test]
    fn test_category_and_query_combine() {
        let prompts = fixtures();
        let filter =
            PromptFilter::new(CategoryFilter::Only(Category::Personal), "week");

        let visible = filter.apply(&prompts);

        assert_eq!(ids(visible), vec!["2"]);
    }

    #[test]
    fn test_visible_set_matches_definition() {
        let prompts = fixtures();
        for option in CategoryFilter::options() {
            for query in ["", "a", "PLAN", "harbor", "zzz"] {
                let filter = PromptFilter::new(option, query);
                let expected: Vec<&str> = prompts
                    .iter()
                    .filter(|p| {
                        let category_ok = match option {
                            CategoryFilter::All => true,
                            CategoryFilter::Only(c) => p.category == c,
                        };
                        let q = query.to_lowercase();
                        category_ok
                            && (q.is_empty()
                                || p.title.to_lowercase().contains(&q)
                                || p.content.to_lowercase().contains(&q))
                    })
                    .map(|p| p.id.as_str())
                    .collect();

                assert_eq!(ids(filter.apply(&prompts)), expected);
            }
        }
    }

    #[test]
    fn test_parse_selector() {
        assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Art".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Art)
        );
        assert!("Music".parse::<CategoryFilter>().is_err());
        assert_eq!(
            CategoryFilter::options()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec!["All", "Work", "Personal", "Art"]
        );
    }
}
