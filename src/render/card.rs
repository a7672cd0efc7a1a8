use crate::model::{RecipeId, RecipeSummary};
use crate::render::image::upscale_image_url;

/// Heart shown on the save button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartIcon {
    Filled,
    Outline,
}

impl HeartIcon {
    pub fn for_saved(saved: bool) -> Self {
        if saved {
            HeartIcon::Filled
        } else {
            HeartIcon::Outline
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            HeartIcon::Filled => "❤️",
            HeartIcon::Outline => "🤍",
        }
    }
}

/// One line of card/detail metadata, e.g. "⏱️ 45 mins"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaItem {
    pub icon: &'static str,
    pub text: String,
}

/// Everything needed to draw a recipe card
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: RecipeId,
    pub title: String,
    pub image_url: String,
    pub meta: Vec<MetaItem>,
    pub heart: HeartIcon,
    /// `aria-pressed` of the save button
    pub pressed: bool,
    pub href: String,
    /// Source data the save button carries so it can save without a lookup
    pub summary: RecipeSummary,
}

/// Link to the detail page of a recipe
pub fn detail_href(id: RecipeId) -> String {
    format!("?recipe={}", id)
}

pub(crate) fn meta_items(summary: &RecipeSummary) -> Vec<MetaItem> {
    let mut meta = Vec::new();
    if let Some(minutes) = summary.ready_in_minutes.filter(|m| *m > 0) {
        meta.push(MetaItem {
            icon: "⏱️",
            text: format!("{} mins", minutes),
        });
    }
    if let Some(servings) = summary.servings.filter(|s| *s > 0) {
        meta.push(MetaItem {
            icon: "🍽️",
            text: format!("{} servings", servings),
        });
    }
    meta
}

pub fn render_card(summary: &RecipeSummary, saved: bool) -> CardView {
    CardView {
        id: summary.id,
        title: summary.title.clone(),
        image_url: upscale_image_url(&summary.image_url),
        meta: meta_items(summary),
        heart: HeartIcon::for_saved(saved),
        pressed: saved,
        href: detail_href(summary.id),
        summary: summary.clone(),
    }
}
