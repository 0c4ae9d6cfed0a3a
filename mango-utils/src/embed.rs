use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x90_55_30;

/// Items shown per page in list embeds.
pub const PAGE_SIZE: usize = 25;

pub fn build_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
}

/// Clamp a 1-based page number and return it with the total page count.
pub fn page_bounds(item_count: usize, requested_page: usize) -> (usize, usize) {
    let total_pages = item_count.div_ceil(PAGE_SIZE).max(1);
    (requested_page.clamp(1, total_pages), total_pages)
}

/// Build one page of a list embed; the footer is omitted for single-page lists.
pub fn build_paginated_embed<S: AsRef<str>>(
    title: &str,
    items: &[S],
    requested_page: usize,
) -> serenity::CreateEmbed {
    let (page, total_pages) = page_bounds(items.len(), requested_page);
    let description = items
        .iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .map(|item| format!("`{}`", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n");

    let builder = build_embed(title, description);
    if total_pages > 1 {
        builder.footer(serenity::CreateEmbedFooter::new(format!(
            "Page {}/{}",
            page, total_pages
        )))
    } else {
        builder
    }
}
