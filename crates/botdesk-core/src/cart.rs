//! Command shop selection cart.
//!
//! Selecting a command is treated as a completed micro-purchase: once an item
//! is selected it stays selected for the rest of the session. Totals are
//! always derived from the item map, never cached.

use std::collections::HashMap;

use crate::pricing::{Price, format_vnd};
use crate::validation::ValidationError;

pub type ItemId = u32;

/// A purchasable bot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub price: Price,
}

/// The static command catalog, in display order.
pub const CATALOG: &[CatalogItem] = &[
    CatalogItem {
        id: 1,
        name: "AI Chat",
        icon: "🤖",
        description: "Chat with a smart AI",
        price: 50_000,
    },
    CatalogItem {
        id: 2,
        name: "Music",
        icon: "🎵",
        description: "Play music from YouTube",
        price: 30_000,
    },
    CatalogItem {
        id: 3,
        name: "Image Gen",
        icon: "🎨",
        description: "Generate images from text",
        price: 70_000,
    },
    CatalogItem {
        id: 4,
        name: "Translate",
        icon: "🌐",
        description: "Automatic translation",
        price: 20_000,
    },
    CatalogItem {
        id: 5,
        name: "Weather",
        icon: "🌤️",
        description: "Realtime weather",
        price: 15_000,
    },
    CatalogItem {
        id: 6,
        name: "Wiki Search",
        icon: "📚",
        description: "Look things up on Wikipedia",
        price: 25_000,
    },
    CatalogItem {
        id: 7,
        name: "TikTok Down",
        icon: "📱",
        description: "Download TikTok videos",
        price: 40_000,
    },
    CatalogItem {
        id: 8,
        name: "Game Mini",
        icon: "🎮",
        description: "Fun mini games",
        price: 35_000,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItem {
    pub id: ItemId,
    pub price: Price,
    pub selected: bool,
}

/// Result of selecting an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    /// Already selected earlier; nothing changed.
    AlreadyOwned,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct Cart {
    catalog: Vec<CatalogItem>,
    items: HashMap<ItemId, CartItem>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::from_catalog(CATALOG)
    }
}

impl Cart {
    pub fn from_catalog(catalog: &[CatalogItem]) -> Self {
        let items = catalog
            .iter()
            .map(|item| {
                (
                    item.id,
                    CartItem {
                        id: item.id,
                        price: item.price,
                        selected: false,
                    },
                )
            })
            .collect();
        Self {
            catalog: catalog.to_vec(),
            items,
        }
    }

    pub fn catalog(&self) -> &[CatalogItem] {
        &self.catalog
    }

    pub fn select(&mut self, id: ItemId) -> SelectOutcome {
        match self.items.get_mut(&id) {
            None => SelectOutcome::Unknown,
            Some(item) if item.selected => SelectOutcome::AlreadyOwned,
            Some(item) => {
                item.selected = true;
                tracing::debug!(item = id, "cart item selected");
                SelectOutcome::Selected
            }
        }
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.items.get(&id).is_some_and(|item| item.selected)
    }

    /// Selected items in catalog order (not selection order).
    pub fn selected_items(&self) -> impl Iterator<Item = &CartItem> + '_ {
        self.catalog
            .iter()
            .filter_map(|entry| self.items.get(&entry.id))
            .filter(|item| item.selected)
    }

    pub fn total(&self) -> Price {
        self.selected_items().map(|item| item.price).sum()
    }

    pub fn count(&self) -> usize {
        self.selected_items().count()
    }

    /// Purchase confirmation text listing each selected command and the total.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyCart` when nothing is selected.
    pub fn checkout_summary(&self) -> Result<String, ValidationError> {
        let lines: Vec<String> = self
            .catalog
            .iter()
            .filter(|entry| self.is_selected(entry.id))
            .map(|entry| format!("• {}: {}", entry.name, format_vnd(entry.price)))
            .collect();
        if lines.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        Ok(format!(
            "Confirm purchase:\n\n{}\n\nTotal: {}",
            lines.join("\n"),
            format_vnd(self.total())
        ))
    }
}
