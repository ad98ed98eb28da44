//! Searchable two-level category picker.

use api_types::category::{CategoryDetails, Subcategory};
use maud::{Markup, html};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::render;

/// Lowercased, accent-stripped form used for matching.
pub(crate) fn fold(input: &str) -> String {
    input
        .trim()
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A category and the subcategories that survived a filter.
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    pub category: &'a CategoryDetails,
    pub subcategories: Vec<&'a Subcategory>,
}

#[derive(Clone, Debug, Default)]
pub struct CategoryPicker {
    categories: Vec<CategoryDetails>,
    query: String,
    selected: Option<i64>,
}

impl CategoryPicker {
    pub fn new(categories: Vec<CategoryDetails>, selected: Option<i64>) -> Self {
        Self {
            categories,
            query: String::new(),
            selected,
        }
    }

    pub fn categories(&self) -> &[CategoryDetails] {
        &self.categories
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Groups whose name or subcategory names contain `query`.
    ///
    /// A subcategory is kept when its own name or its parent's name matches;
    /// groups left with no subcategories are dropped.
    pub fn filter(&self, query: &str) -> Vec<CategoryGroup<'_>> {
        let needle = fold(query);
        self.categories
            .iter()
            .filter_map(|category| {
                let parent_matches = fold(&category.name).contains(&needle);
                let subcategories: Vec<&Subcategory> = category
                    .subcategories
                    .iter()
                    .filter(|sub| parent_matches || fold(&sub.name).contains(&needle))
                    .collect();
                (!subcategories.is_empty()).then_some(CategoryGroup {
                    category,
                    subcategories,
                })
            })
            .collect()
    }

    /// Groups for the current query.
    pub fn visible(&self) -> Vec<CategoryGroup<'_>> {
        self.filter(&self.query)
    }

    pub fn find(&self, subcategory_id: i64) -> Option<(&CategoryDetails, &Subcategory)> {
        self.categories.iter().find_map(|category| {
            category
                .subcategories
                .iter()
                .find(|sub| sub.id == subcategory_id)
                .map(|sub| (category, sub))
        })
    }

    /// Selects a subcategory; unknown ids leave the selection unchanged.
    pub fn select(&mut self, subcategory_id: i64) -> bool {
        if self.find(subcategory_id).is_none() {
            return false;
        }
        self.selected = Some(subcategory_id);
        true
    }

    pub fn set_selected(&mut self, subcategory_id: Option<i64>) {
        self.selected = subcategory_id;
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    pub fn is_selected(&self, subcategory_id: i64) -> bool {
        self.selected == Some(subcategory_id)
    }

    pub fn render(&self) -> Markup {
        let groups = self.visible();
        html! {
            div class="category-picker" {
                input type="search" id="category-search" placeholder="Search categories" value=(self.query);
                @if groups.is_empty() {
                    p class="empty-state" { "No matching categories." }
                }
                @for group in &groups {
                    div class="category-group" data-category-id=(group.category.id) {
                        div class="category-group-title" { (group.category.name) }
                        div class="subcategory-grid" {
                            @for sub in &group.subcategories {
                                button
                                    type="button"
                                    class=(if self.is_selected(sub.id) { "subcategory-item selected" } else { "subcategory-item" })
                                    data-subcategory-id=(sub.id)
                                {
                                    span class="subcategory-icon" { (render::icon(sub.icon.as_ref())) }
                                    span class="subcategory-name" { (sub.name) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
