use std::collections::HashMap;

use cmdtree_core::definitions::ColorDefinition;
use cmdtree_core::error::{Error, Result};
use cmdtree_core::resolver::Category;
use crossterm::style::Color;

/// Trait for converting color definitions to terminal colors
pub trait AsTermColor {
    fn as_crossterm_color(&self) -> Result<Option<Color>>;
}

impl AsTermColor for ColorDefinition {
    fn as_crossterm_color(&self) -> Result<Option<Color>> {
        let defined_count = [self.rgb.is_some(), self.ansi.is_some(), self.name.is_some()]
            .iter()
            .filter(|&&x| x)
            .count();

        if defined_count > 1 {
            return Err(Error::MultipleColorTypes);
        }

        Ok(match (self.rgb, self.ansi, &self.name) {
            (Some((r, g, b)), None, None) => Some(Color::Rgb { r, g, b }),
            (None, Some(ansi), None) => Some(Color::AnsiValue(ansi)),
            (None, None, Some(name)) => Some(match name.to_lowercase().as_str() {
                "reset" => Color::Reset,
                "black" => Color::Black,
                "darkgrey" => Color::DarkGrey,
                "red" => Color::Red,
                "darkred" => Color::DarkRed,
                "green" => Color::Green,
                "darkgreen" => Color::DarkGreen,
                "yellow" => Color::Yellow,
                "darkyellow" => Color::DarkYellow,
                "blue" => Color::Blue,
                "darkblue" => Color::DarkBlue,
                "magenta" => Color::Magenta,
                "darkmagenta" => Color::DarkMagenta,
                "cyan" => Color::Cyan,
                "darkcyan" => Color::DarkCyan,
                "white" => Color::White,
                "grey" => Color::Grey,
                _ => return Err(Error::UnknownColorName(name.to_string())),
            }),
            _ => None,
        })
    }
}

/// Foreground color per display category.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    colors: HashMap<Category, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let colors = HashMap::from([
            (Category::Normal, Color::Reset),
            (Category::UnknownToken, Color::DarkRed),
            (Category::ValidCommand, Color::DarkGreen),
            (Category::PartialCommand, Color::DarkYellow),
            (Category::InvalidCommand, Color::Red),
            (Category::Completion, Color::DarkCyan),
            (Category::QuotedString, Color::Blue),
            (Category::ValidArgument, Color::White),
            (Category::PartialArgument, Color::Reset),
            (Category::InvalidArgument, Color::Red),
        ]);
        Self { colors }
    }
}

impl Theme {
    /// The default theme with `overrides` applied. Color definitions that
    /// define nothing keep the default.
    pub fn with_overrides<'a, I>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Category, &'a ColorDefinition)>,
    {
        let mut theme = Self::default();
        for (category, definition) in overrides {
            if let Some(color) = definition.as_crossterm_color()? {
                theme.colors.insert(category, color);
            }
        }
        Ok(theme)
    }

    pub fn color(&self, category: Category) -> Color {
        self.colors.get(&category).copied().unwrap_or(Color::Reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(rgb: Option<(u8, u8, u8)>, ansi: Option<u8>, name: Option<&str>) -> ColorDefinition {
        ColorDefinition {
            rgb,
            ansi,
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_color_definition_forms() {
        assert_eq!(
            definition(Some((1, 2, 3)), None, None).as_crossterm_color().unwrap(),
            Some(Color::Rgb { r: 1, g: 2, b: 3 })
        );
        assert_eq!(
            definition(None, Some(42), None).as_crossterm_color().unwrap(),
            Some(Color::AnsiValue(42))
        );
        assert_eq!(
            definition(None, None, Some("DarkCyan")).as_crossterm_color().unwrap(),
            Some(Color::DarkCyan)
        );
        assert_eq!(definition(None, None, None).as_crossterm_color().unwrap(), None);
    }

    #[test]
    fn test_color_definition_errors() {
        assert!(matches!(
            definition(Some((1, 2, 3)), Some(4), None).as_crossterm_color(),
            Err(Error::MultipleColorTypes)
        ));
        assert!(matches!(
            definition(None, None, Some("chartreuse")).as_crossterm_color(),
            Err(Error::UnknownColorName(_))
        ));
    }

    #[test]
    fn test_theme_overrides() {
        let valid = definition(None, Some(10), None);
        let empty = definition(None, None, None);
        let theme = Theme::with_overrides([
            (Category::ValidCommand, &valid),
            (Category::InvalidArgument, &empty),
        ])
        .unwrap();

        assert_eq!(theme.color(Category::ValidCommand), Color::AnsiValue(10));
        assert_eq!(theme.color(Category::InvalidArgument), Color::Red);
        assert_eq!(theme.color(Category::Normal), Color::Reset);
    }
}
