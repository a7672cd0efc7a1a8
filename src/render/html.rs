//! HTML fragments for the site's `fbad-` component classes. Every piece of
//! recipe text is escaped; service-supplied markup is never passed through.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::notify::SavedListOverlay;
use crate::render::{
    CardView, DetailView, InstructionsView, MetaItem, NutrientRow, NutritionView, RecipePage,
};
use crate::saved::Badge;

/// Inline status shown in place of the results grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Loading,
    Error,
}

pub fn status_html(status: Status, message: &str) -> String {
    let class = match status {
        Status::Loading => "fbad-loading",
        Status::Error => "fbad-error",
    };
    format!(r#"<div class="{}">{}</div>"#, class, text(message))
}

fn meta_html(meta: &[MetaItem], class: &str) -> String {
    meta.iter()
        .map(|item| {
            format!(
                r#"<div class="{class}"><span>{}</span><span>{}</span></div>"#,
                item.icon,
                text(&item.text)
            )
        })
        .collect()
}

fn save_button_attrs(summary: &crate::model::RecipeSummary, pressed: bool) -> String {
    format!(
        r#"data-recipe-id="{}" data-recipe-title="{}" data-recipe-image="{}" data-recipe-time="{}" data-recipe-servings="{}" aria-label="Save recipe" aria-pressed="{}""#,
        summary.id,
        attr(&summary.title),
        attr(&summary.image_url),
        summary
            .ready_in_minutes
            .map(|m| m.to_string())
            .unwrap_or_default(),
        summary.servings.map(|s| s.to_string()).unwrap_or_default(),
        pressed
    )
}

pub fn card_html(card: &CardView) -> String {
    format!(
        concat!(
            r#"<div class="fbad-recipe-card">"#,
            r#"<div class="fbad-recipe-card__image-wrapper">"#,
            r#"<img class="fbad-recipe-card__image" src="{image}" alt="{alt}">"#,
            r#"<button class="fbad-recipe-card__save-btn{saved}" {data}><span>{heart}</span></button>"#,
            r#"</div>"#,
            r#"<div class="fbad-recipe-card__content">"#,
            r#"<h3 class="fbad-recipe-card__title">{title}</h3>"#,
            r#"<div class="fbad-recipe-card__meta">{meta}</div>"#,
            r#"<div class="fbad-recipe-card__footer"><a href="{href}" class="fbad-recipe-card__cta">View Recipe →</a></div>"#,
            r#"</div></div>"#
        ),
        image = attr(&card.image_url),
        alt = attr(&card.title),
        saved = if card.pressed { " is-saved" } else { "" },
        data = save_button_attrs(&card.summary, card.pressed),
        heart = card.heart.glyph(),
        title = text(&card.title),
        meta = meta_html(&card.meta, "fbad-recipe-card__meta-item"),
        href = attr(&card.href),
    )
}

/// Results grid, with a "load more" control while more pages may exist
pub fn grid_html(cards: &[CardView], has_more: bool) -> String {
    let mut html = String::from(r#"<div class="fbad-recipe-grid">"#);
    for card in cards {
        html.push_str(&card_html(card));
    }
    html.push_str("</div>");
    if has_more {
        html.push_str(r#"<button class="fbad-button fbad-load-more">Load More Recipes</button>"#);
    }
    html
}

fn nutrient_row_html(row: &NutrientRow) -> String {
    let mut html = format!(
        r#"<div class="fbad-nutrition__macro"><div class="fbad-nutrition__macro-label">{}</div><div class="fbad-nutrition__macro-value">{}{}</div>"#,
        row.label,
        row.amount,
        text(&row.unit)
    );
    if let Some(percent) = row.percent_of_daily_needs {
        let _ = write!(
            html,
            r#"<div class="fbad-nutrition__macro-percent">{}%</div>"#,
            percent
        );
    }
    html.push_str("</div>");
    html
}

fn nutrition_html(nutrition: &NutritionView) -> String {
    let mut html = String::from(
        r#"<div class="fbad-nutrition"><h2 class="fbad-nutrition__title">Nutrition Facts</h2><div class="fbad-nutrition__per-serving">Per Serving</div>"#,
    );
    if let Some(calories) = nutrition.calories {
        let _ = write!(
            html,
            r#"<div class="fbad-nutrition__calories"><span class="fbad-nutrition__calories-label">Calories</span><span class="fbad-nutrition__calories-value">{}</span></div>"#,
            calories
        );
    }
    html.push_str(r#"<div class="fbad-nutrition__divider"></div><div class="fbad-nutrition__macros">"#);
    for row in &nutrition.macros {
        html.push_str(&nutrient_row_html(row));
    }
    html.push_str("</div>");

    if !nutrition.details.is_empty() {
        html.push_str(
            r#"<details class="fbad-nutrition__details"><summary class="fbad-nutrition__details-summary">View Detailed Breakdown</summary><div class="fbad-nutrition__details-content">"#,
        );
        for group in &nutrition.details {
            let _ = write!(
                html,
                r#"<div class="fbad-nutrition__detail-group"><h3 class="fbad-nutrition__detail-group-title">{}</h3>"#,
                group.title
            );
            for row in &group.rows {
                let _ = write!(
                    html,
                    r#"<div class="fbad-nutrition__detail-row"><span class="fbad-nutrition__detail-label">{}</span><span class="fbad-nutrition__detail-value">{}{}</span></div>"#,
                    row.label,
                    row.amount,
                    text(&row.unit)
                );
            }
            html.push_str("</div>");
        }
        html.push_str("</div></details>");
    }
    html.push_str("</div>");
    html
}

fn instructions_html(instructions: &InstructionsView) -> String {
    match instructions {
        InstructionsView::Steps(steps) => {
            let mut html = String::from(r#"<div class="fbad-instructions">"#);
            for step in steps {
                let _ = write!(
                    html,
                    r#"<div class="fbad-instructions__step"><div class="fbad-instructions__number">{}</div><div class="fbad-instructions__text">{}</div></div>"#,
                    step.number,
                    text(&step.text)
                );
            }
            html.push_str("</div>");
            html
        }
        InstructionsView::Text(body) => {
            format!(r#"<div class="fbad-instructions__text">{}</div>"#, text(body))
        }
        InstructionsView::Missing(message) => format!("<p>{}</p>", text(message)),
    }
}

pub fn detail_html(view: &DetailView) -> String {
    let mut html = String::from(r#"<article class="fbad-recipe-detail">"#);
    let _ = write!(
        html,
        r#"<div class="fbad-recipe-detail__hero"><img src="{}" alt="{}" class="fbad-recipe-detail__image"></div>"#,
        attr(&view.hero_image_url),
        attr(&view.title)
    );
    let _ = write!(
        html,
        r#"<header class="fbad-recipe-detail__header"><div class="fbad-recipe-detail__title-row"><h1 class="fbad-recipe-detail__title">{}</h1><button class="fbad-save-btn fbad-save-btn--detail{}" {}><span class="fbad-save-icon">{}</span><span class="fbad-recipe-detail__save-text">{}</span></button></div><div class="fbad-recipe-detail__meta">{}</div></header>"#,
        text(&view.title),
        if view.pressed { " is-saved" } else { "" },
        save_button_attrs(&view.summary, view.pressed),
        view.heart.glyph(),
        view.save_label,
        meta_html(&view.meta, "fbad-recipe-detail__meta-item")
    );
    if let Some(description) = &view.description {
        let _ = write!(
            html,
            r#"<p class="fbad-recipe-detail__summary">{}</p>"#,
            text(description)
        );
    }
    if let Some(nutrition) = &view.nutrition {
        html.push_str(&nutrition_html(nutrition));
    }

    html.push_str(r#"<div class="fbad-recipe-detail__main"><aside class="fbad-recipe-detail__sidebar"><h2 class="fbad-recipe-detail__section-title">Ingredients</h2><div class="fbad-ingredients-checklist">"#);
    for ingredient in &view.ingredients {
        let _ = write!(
            html,
            r#"<label class="fbad-ingredient"><input type="checkbox" class="fbad-ingredient__checkbox"><span class="fbad-ingredient__text">{}</span></label>"#,
            text(ingredient)
        );
    }
    html.push_str(r#"</div></aside><div class="fbad-recipe-detail__instructions"><h2 class="fbad-recipe-detail__section-title">Instructions</h2>"#);
    html.push_str(&instructions_html(&view.instructions));
    html.push_str("</div></div>");

    if let Some(url) = &view.source_url {
        let _ = write!(
            html,
            r#"<a href="{}" class="fbad-recipe-detail__source" rel="nofollow">Original recipe</a>"#,
            attr(url)
        );
    }
    html.push_str("</article>");
    html
}

pub fn page_html(page: &RecipePage) -> String {
    match page {
        RecipePage::Found(view) => detail_html(view),
        RecipePage::NotFound { heading, message }
        | RecipePage::Unavailable { heading, message }
        | RecipePage::NoneSelected { heading, message } => format!(
            r#"<div class="fbad-error-page"><div class="fbad-container"><h1>{}</h1><p>{}</p><a href="/" class="fbad-button">← Back to Homepage</a></div></div>"#,
            text(heading),
            text(message)
        ),
    }
}

pub fn overlay_html(overlay: &SavedListOverlay) -> String {
    if !overlay.is_open() {
        return String::new();
    }
    let cards: String = overlay.cards().iter().map(card_html).collect();
    format!(
        r#"<div class="fbad-modal"><div class="fbad-modal__backdrop"></div><div class="fbad-modal__content"><div class="fbad-modal__header"><h2>Saved Recipes</h2><button class="fbad-modal__close">×</button></div><div class="fbad-modal__body"><div class="fbad-recipe-grid">{}</div></div></div></div>"#,
        cards
    )
}

pub fn badge_html(badge: Badge) -> String {
    format!(
        r#"<span class="fbad-saved-badge__count"{}>{}</span>"#,
        if badge.visible { "" } else { " hidden" },
        badge.count
    )
}

pub fn toast_html(message: &str) -> String {
    format!(r#"<div class="fbad-toast show">{}</div>"#, text(message))
}
