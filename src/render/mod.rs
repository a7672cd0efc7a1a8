//! Pure mapping from recipe data and saved state to display descriptors.
//! [`html`] turns the descriptors into markup.

mod card;
mod detail;
pub mod html;
mod image;

pub use card::{detail_href, render_card, CardView, HeartIcon, MetaItem};
pub use detail::{
    render_detail, render_nutrition, DetailView, InstructionsView, NutrientGroup, NutrientRow,
    NutritionView, RecipePage, StepView, NO_INSTRUCTIONS,
};
pub use image::{upscale_image_url, LARGE_IMAGE_SIZE};
