// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the shine-probe project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Named register fragments

use serde::{Deserialize, Serialize};

/// A named contiguous range of holding registers, `start..=start + size - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub name: String,
    pub start: u16,
    pub size: u16,
}

impl Fragment {
    pub fn new(name: impl Into<String>, start: u16, size: u16) -> Self {
        Self {
            name: name.into(),
            start,
            size,
        }
    }

    /// Last register of the fragment, `None` if the fragment is empty or
    /// runs past the end of the register space.
    pub fn end(&self) -> Option<u16> {
        self.size
            .checked_sub(1)
            .and_then(|last| self.start.checked_add(last))
    }

    /// Registers of the fragment in order.
    pub fn registers(&self) -> impl Iterator<Item = u16> {
        let start = self.start;
        let end = self.end();
        end.into_iter().flat_map(move |end| start..=end)
    }
}

/// Holding register fragments read by the protocol 3.07 firmware.
pub fn default_fragments() -> Vec<Fragment> {
    vec![
        Fragment::new("Active Power Rate", 3, 1),
        Fragment::new("Date/Time", 45, 6),
        Fragment::new("Export Limit", 122, 2),
        Fragment::new("Grid First settings", 1070, 2),
        Fragment::new("Grid First time slots", 1080, 9),
        Fragment::new("Battery First settings", 1090, 3),
        Fragment::new("Battery First time slots", 1100, 9),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_bounds() {
        let slots = Fragment::new("Grid First time slots", 1080, 9);
        assert_eq!(slots.end(), Some(1088));
        assert_eq!(slots.registers().count(), 9);
        assert_eq!(slots.registers().last(), Some(1088));

        assert_eq!(Fragment::new("empty", 10, 0).end(), None);
        assert_eq!(Fragment::new("overflow", u16::MAX, 2).end(), None);
        assert_eq!(Fragment::new("last", u16::MAX, 1).end(), Some(u16::MAX));
    }
}
