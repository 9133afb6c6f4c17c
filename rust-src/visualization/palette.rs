//! Fixed color palette and per-municipality color assignment.

use std::collections::HashMap;


// Named categorical schemes, concatenated in this order.
const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];
const ACCENT: [&str; 8] = [
    "#7fc97f", "#beaed4", "#fdc086", "#ffff99", "#386cb0", "#f0027f", "#bf5b17", "#666666",
];
const DARK2: [&str; 8] = [
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666",
];
const PAIRED: [&str; 12] = [
    "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c",
    "#fdbf6f", "#ff7f00", "#cab2d6", "#6a3d9a", "#ffff99", "#b15928",
];
const SET1: [&str; 9] = [
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00",
    "#ffff33", "#a65628", "#f781bf", "#999999",
];
const SET2: [&str; 8] = [
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];
const SET3: [&str; 12] = [
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462",
    "#b3de69", "#fccde5", "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
];
const EXTRA: [&str; 8] = [
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#a65628", "#f781bf", "#999999",
];

const SCHEMES: [&[&str]; 8] = [&CATEGORY10, &ACCENT, &DARK2, &PAIRED, &SET1, &SET2, &SET3, &EXTRA];


/// The display palette: every scheme concatenated, repeated tokens removed
/// (first occurrence wins).
pub fn palette() -> Vec<&'static str> {
    let mut colors: Vec<&'static str> = Vec::new();
    for scheme in SCHEMES {
        for &color in scheme {
            if !colors.contains(&color) {
                colors.push(color);
            }
        }
    }
    colors
}


/// Stable municipality name -> color token mapping.
#[derive(Debug, Clone, Default)]
pub struct ColorAssignment {
    colors: HashMap<String, &'static str>,
}


impl ColorAssignment {
    /// Assign colors in iteration order, cycling the palette when it runs out.
    pub fn assign<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let palette = palette();
        let colors = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), palette[i % palette.len()]))
            .collect();
        Self { colors }
    }

    /// Color token for a municipality; unknown names get neutral grey.
    pub fn color_of(&self, name: &str) -> &'static str {
        self.colors.get(name).copied().unwrap_or("#999999")
    }
}


/// Convert a `#rrggbb` token to an RGB tuple.
pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return (0, 0, 0);
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    (r, g, b)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("m{i}")).collect()
    }

    #[test]
    fn test_palette_has_enough_distinct_colors() {
        let p = palette();
        let distinct: HashSet<_> = p.iter().collect();
        assert_eq!(distinct.len(), p.len());
        assert!(p.len() >= 59);
    }

    #[test]
    fn test_first_59_collision_free() {
        let names = names(59);
        let colors = ColorAssignment::assign(names.iter().map(String::as_str));
        let used: HashSet<_> = names.iter().map(|n| colors.color_of(n)).collect();
        assert_eq!(used.len(), 59);
    }

    #[test]
    fn test_assignment_deterministic() {
        let names = names(20);
        let a = ColorAssignment::assign(names.iter().map(String::as_str));
        let b = ColorAssignment::assign(names.iter().map(String::as_str));
        for n in &names {
            assert_eq!(a.color_of(n), b.color_of(n));
        }
        assert_eq!(a.color_of("m0"), "#1f77b4");
    }

    #[test]
    fn test_wraps_beyond_palette() {
        let len = palette().len();
        let names = names(len + 1);
        let colors = ColorAssignment::assign(names.iter().map(String::as_str));
        assert_eq!(colors.color_of(&names[len]), colors.color_of(&names[0]));
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#1f77b4"), (0x1f, 0x77, 0xb4));
        assert_eq!(hex_to_rgb("bad"), (0, 0, 0));
    }
}
