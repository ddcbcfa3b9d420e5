//! Per-view colour assignment.

use std::collections::HashMap;

use crate::constants::{FLAT_COLOUR, PALETTE};

/// Hands out display colours to modules for one rendered view.
///
/// A picker is built fresh for every view and dropped with it.
#[derive(Debug, Clone)]
pub enum ColourPicker {
    /// Pops colours off a fixed palette, remembering what each key got
    Palette {
        remaining: Vec<&'static str>,
        assigned: HashMap<String, &'static str>,
    },
    /// Same colour for everyone
    Flat,
}

impl ColourPicker {
    pub fn palette() -> Self {
        ColourPicker::Palette {
            remaining: PALETTE.to_vec(),
            assigned: HashMap::new(),
        }
    }

    /// Palette colours when they can tell `module_count` modules apart,
    /// otherwise flat.
    pub fn for_module_count(module_count: usize) -> Self {
        if module_count > PALETTE.len() {
            ColourPicker::Flat
        } else {
            Self::palette()
        }
    }

    pub fn colour_for(&mut self, key: &str) -> &'static str {
        match self {
            ColourPicker::Flat => FLAT_COLOUR,
            ColourPicker::Palette { remaining, assigned } => {
                if let Some(colour) = assigned.get(key) {
                    return *colour;
                }
                let colour = remaining.pop().unwrap_or(FLAT_COLOUR);
                assigned.insert(key.to_string(), colour);
                colour
            }
        }
    }
}
