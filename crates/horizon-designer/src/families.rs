//! Standard widget families.
//!
//! This module supplies a ready-made set of families for the capability
//! registry, each with a constructor and setters, and the matching embedded
//! attribute schema. Every family is backed by [`StandardWidget`], a plain
//! state record with optional facets (text, linear layout, checkable)
//! enabled by the family's lineage.
//!
//! Hosts that render real widgets register their own families instead;
//! the standard set is enough to edit, serialize and test layouts without a
//! UI toolkit.

use std::any::Any;
use std::sync::LazyLock;

use horizon_designer_core::logging::targets;
use horizon_designer_core::{
    strip_id_prefix, AttributeSchema, CapabilityRegistry, FamilyTraits, LayoutAxis, SchemaError,
    SetterError, Size, Widget,
};
use regex::Regex;

/// Fully-qualified names of the standard families.
pub mod types {
    pub const VIEW: &str = "android.view.View";
    pub const VIEW_GROUP: &str = "android.view.ViewGroup";
    pub const LINEAR_LAYOUT: &str = "android.widget.LinearLayout";
    pub const FRAME_LAYOUT: &str = "android.widget.FrameLayout";
    pub const LIST_VIEW: &str = "android.widget.ListView";
    pub const CALENDAR_VIEW: &str = "android.widget.CalendarView";
    pub const TEXT_VIEW: &str = "android.widget.TextView";
    pub const BUTTON: &str = "android.widget.Button";
    pub const COMPOUND_BUTTON: &str = "android.widget.CompoundButton";
    pub const CHECK_BOX: &str = "android.widget.CheckBox";
    pub const SWITCH: &str = "android.widget.Switch";

    pub const VIEW_DESIGN: &str = "designer.ViewDesign";
    pub const LINEAR_LAYOUT_DESIGN: &str = "designer.LinearLayoutDesign";
    pub const TEXT_VIEW_DESIGN: &str = "designer.TextViewDesign";
    pub const BUTTON_DESIGN: &str = "designer.ButtonDesign";
}

use types::*;

// ============================================================================
// Values
// ============================================================================

/// A layout size or dimension value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    MatchParent,
    #[default]
    WrapContent,
    /// Density-independent pixels.
    Dp(f32),
    /// Scale-independent pixels.
    Sp(f32),
}

static DIMENSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?)(dp|sp)$").expect("dimension pattern is valid")
});

impl Dimension {
    /// Parse `<number>dp` or `<number>sp`.
    pub fn parse_dimension(value: &str) -> Result<Self, SetterError> {
        let caps = DIMENSION_PATTERN
            .captures(value.trim())
            .ok_or_else(|| SetterError::invalid(value, "a dimension such as 16dp or 14sp"))?;
        let amount: f32 = caps[1]
            .parse()
            .map_err(|_| SetterError::invalid(value, "a numeric dimension"))?;
        Ok(match &caps[2] {
            "sp" => Self::Sp(amount),
            _ => Self::Dp(amount),
        })
    }

    /// Parse a layout size: `match_parent`, `fill_parent`, `wrap_content` or
    /// a dimension.
    pub fn parse_size(value: &str) -> Result<Self, SetterError> {
        match value.trim() {
            "match_parent" | "fill_parent" => Ok(Self::MatchParent),
            "wrap_content" => Ok(Self::WrapContent),
            other => Self::parse_dimension(other),
        }
    }

    /// The numeric amount for unit dimensions.
    pub fn amount(&self) -> Option<f32> {
        match self {
            Self::Dp(v) | Self::Sp(v) => Some(*v),
            _ => None,
        }
    }
}

/// An ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Parse `#RRGGBB` or `#AARRGGBB`.
    pub fn from_hex(value: &str) -> Result<Self, SetterError> {
        let invalid = || SetterError::invalid(value, "a color such as #RRGGBB or #AARRGGBB");
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        let raw = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        let argb = match hex.len() {
            6 => 0xFF00_0000 | raw,
            8 => raw,
            _ => return Err(invalid()),
        };
        Ok(Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        })
    }
}

/// A widget background.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color(Color),
    /// Drawable resource reference, kept verbatim.
    Drawable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Invisible,
    Gone,
}

/// Gravity bit flags.
pub mod gravity {
    pub const NO_GRAVITY: u32 = 0x0000;
    pub const CENTER_HORIZONTAL: u32 = 0x0001;
    pub const LEFT: u32 = 0x0003;
    pub const RIGHT: u32 = 0x0005;
    pub const CENTER_VERTICAL: u32 = 0x0010;
    pub const TOP: u32 = 0x0030;
    pub const BOTTOM: u32 = 0x0050;
    pub const CENTER: u32 = 0x0011;
    pub const START: u32 = 0x0080_0003;
    pub const END: u32 = 0x0080_0005;

    /// Parse `|`-joined gravity names.
    pub fn parse(value: &str) -> Option<u32> {
        value.split('|').map(str::trim).try_fold(NO_GRAVITY, |acc, name| {
            let bits = match name {
                "center_horizontal" => CENTER_HORIZONTAL,
                "left" => LEFT,
                "right" => RIGHT,
                "center_vertical" => CENTER_VERTICAL,
                "top" => TOP,
                "bottom" => BOTTOM,
                "center" => CENTER,
                "start" => START,
                "end" => END,
                _ => return None,
            };
            Some(acc | bits)
        })
    }
}

/// Text style bit flags.
pub mod text_style {
    pub const NORMAL: u8 = 0;
    pub const BOLD: u8 = 1;
    pub const ITALIC: u8 = 2;

    /// Parse `|`-joined style names.
    pub fn parse(value: &str) -> Option<u8> {
        value.split('|').map(str::trim).try_fold(NORMAL, |acc, name| {
            let bits = match name {
                "normal" => NORMAL,
                "bold" => BOLD,
                "italic" => ITALIC,
                _ => return None,
            };
            Some(acc | bits)
        })
    }
}

/// Left, top, right and bottom amounts in dp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Edges {
    fn all(amount: f32) -> Self {
        Self {
            left: amount,
            top: amount,
            right: amount,
            bottom: amount,
        }
    }
}

// ============================================================================
// Widget state
// ============================================================================

/// State shared by every view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewProps {
    pub id: Option<String>,
    pub layout_width: Dimension,
    pub layout_height: Dimension,
    pub minimum: Size,
    pub background: Option<Background>,
    pub elevation: f32,
    pub alpha: f32,
    pub rotation: f32,
    pub translation_x: f32,
    pub translation_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub padding: Edges,
    pub enabled: bool,
    pub visibility: Visibility,
    /// Margins granted by the parent container.
    pub margin: Edges,
    /// Weight granted by a linear parent.
    pub layout_weight: f32,
    /// Gravity granted by a linear or frame parent.
    pub layout_gravity: u32,
}

impl Default for ViewProps {
    fn default() -> Self {
        Self {
            id: None,
            layout_width: Dimension::WrapContent,
            layout_height: Dimension::WrapContent,
            minimum: Size::default(),
            background: None,
            elevation: 0.0,
            alpha: 1.0,
            rotation: 0.0,
            translation_x: 0.0,
            translation_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            padding: Edges::default(),
            enabled: true,
            visibility: Visibility::Visible,
            margin: Edges::default(),
            layout_weight: 0.0,
            layout_gravity: gravity::NO_GRAVITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextProps {
    pub text: String,
    pub text_size: Dimension,
    pub text_color: Option<Color>,
    pub gravity: u32,
    pub text_style: u8,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            text: String::new(),
            text_size: Dimension::Sp(14.0),
            text_color: None,
            gravity: gravity::NO_GRAVITY,
            text_style: text_style::NORMAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearProps {
    pub orientation: LayoutAxis,
    pub gravity: u32,
}

impl Default for LinearProps {
    fn default() -> Self {
        Self {
            orientation: LayoutAxis::Horizontal,
            gravity: gravity::NO_GRAVITY,
        }
    }
}

/// The widget record behind every standard family.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardWidget {
    type_name: String,
    pub view: ViewProps,
    pub text: Option<TextProps>,
    pub linear: Option<LinearProps>,
    pub checked: Option<bool>,
}

impl StandardWidget {
    /// Build a widget of `type_name` with the facets its lineage implies.
    pub fn for_family(registry: &CapabilityRegistry, type_name: &str) -> Self {
        Self {
            type_name: type_name.to_owned(),
            view: ViewProps::default(),
            text: registry
                .is_a(type_name, TEXT_VIEW)
                .then(TextProps::default),
            linear: registry
                .is_a(type_name, LINEAR_LAYOUT)
                .then(LinearProps::default),
            checked: registry.is_a(type_name, COMPOUND_BUTTON).then_some(false),
        }
    }
}

impl Widget for StandardWidget {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn set_minimum_size(&mut self, size: Size) {
        self.view.minimum = size;
    }

    fn layout_axis(&self) -> Option<LayoutAxis> {
        self.linear.as_ref().map(|l| l.orientation)
    }

    fn set_identifier(&mut self, identifier: Option<&str>) {
        self.view.id = identifier.map(str::to_owned);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn standard(widget: &mut dyn Widget) -> Result<&mut StandardWidget, SetterError> {
    let type_name = widget.type_name().to_owned();
    widget
        .as_any_mut()
        .downcast_mut::<StandardWidget>()
        .ok_or(SetterError::Unsupported { type_name })
}

fn text_facet(widget: &mut dyn Widget) -> Result<&mut TextProps, SetterError> {
    let w = standard(widget)?;
    let type_name = w.type_name.clone();
    w.text.as_mut().ok_or(SetterError::Unsupported { type_name })
}

fn linear_facet(widget: &mut dyn Widget) -> Result<&mut LinearProps, SetterError> {
    let w = standard(widget)?;
    let type_name = w.type_name.clone();
    w.linear.as_mut().ok_or(SetterError::Unsupported { type_name })
}

fn parse_float(value: &str) -> Result<f32, SetterError> {
    value
        .trim()
        .parse()
        .map_err(|_| SetterError::invalid(value, "a number"))
}

fn parse_bool(value: &str) -> Result<bool, SetterError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SetterError::invalid(value, "true or false")),
    }
}

fn dp_amount(value: &str) -> Result<f32, SetterError> {
    let dimension = Dimension::parse_dimension(value)?;
    Ok(dimension.amount().unwrap_or_default())
}

// ============================================================================
// Registration
// ============================================================================

const FAMILIES: &[(&str, Option<&str>)] = &[
    (VIEW, None),
    (VIEW_GROUP, Some(VIEW)),
    (LINEAR_LAYOUT, Some(VIEW_GROUP)),
    (FRAME_LAYOUT, Some(VIEW_GROUP)),
    (LIST_VIEW, Some(VIEW_GROUP)),
    (CALENDAR_VIEW, Some(FRAME_LAYOUT)),
    (TEXT_VIEW, Some(VIEW)),
    (BUTTON, Some(TEXT_VIEW)),
    (COMPOUND_BUTTON, Some(BUTTON)),
    (CHECK_BOX, Some(COMPOUND_BUTTON)),
    (SWITCH, Some(COMPOUND_BUTTON)),
    (VIEW_DESIGN, Some(VIEW)),
    (LINEAR_LAYOUT_DESIGN, Some(LINEAR_LAYOUT)),
    (TEXT_VIEW_DESIGN, Some(TEXT_VIEW)),
    (BUTTON_DESIGN, Some(BUTTON)),
];

fn traits_for(type_name: &str) -> FamilyTraits {
    match type_name {
        VIEW_GROUP | LINEAR_LAYOUT | FRAME_LAYOUT => FamilyTraits::container(),
        LIST_VIEW => FamilyTraits::container().managing_items(),
        CALENDAR_VIEW => FamilyTraits::container().opaque(),
        LINEAR_LAYOUT_DESIGN => FamilyTraits::container().specialization(),
        VIEW_DESIGN | TEXT_VIEW_DESIGN | BUTTON_DESIGN => FamilyTraits::default().specialization(),
        _ => FamilyTraits::default(),
    }
}

/// Register every standard family, its constructor and all setters.
pub fn register_standard(registry: &mut CapabilityRegistry) {
    for &(type_name, superclass) in FAMILIES {
        registry.register_family(type_name, superclass, traits_for(type_name));
    }

    // Facets depend on lineage, which is complete only once every family is
    // registered.
    let prototypes: Vec<StandardWidget> = FAMILIES
        .iter()
        .map(|&(type_name, _)| StandardWidget::for_family(registry, type_name))
        .collect();
    for prototype in prototypes {
        let type_name = prototype.type_name.clone();
        registry.register_constructor(type_name, move || Box::new(prototype.clone()));
    }

    register_view_setters(registry);
    register_container_setters(registry);
    register_text_setters(registry);

    registry.register_setter(COMPOUND_BUTTON, "setChecked", |w, v| {
        let checked = parse_bool(v)?;
        let w = standard(w)?;
        let type_name = w.type_name.clone();
        let slot = w
            .checked
            .as_mut()
            .ok_or(SetterError::Unsupported { type_name })?;
        *slot = checked;
        Ok(())
    });

    tracing::debug!(target: targets::FAMILIES, families = FAMILIES.len(), "registered standard families");
}

/// A registry holding only the standard families.
pub fn standard_registry() -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    register_standard(&mut registry);
    registry
}

fn register_view_setters(registry: &mut CapabilityRegistry) {
    registry.register_setter(VIEW, "setId", |w, v| {
        let name = strip_id_prefix(v);
        if name.is_empty() {
            return Err(SetterError::invalid(v, "an identifier such as @+id/name"));
        }
        standard(w)?.view.id = Some(name.to_owned());
        Ok(())
    });
    registry.register_setter(VIEW, "setLayoutWidth", |w, v| {
        standard(w)?.view.layout_width = Dimension::parse_size(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setLayoutHeight", |w, v| {
        standard(w)?.view.layout_height = Dimension::parse_size(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setBackground", |w, v| {
        let background = if v.starts_with('#') {
            Background::Color(Color::from_hex(v)?)
        } else if v.starts_with("@drawable/") {
            Background::Drawable(v.to_owned())
        } else {
            return Err(SetterError::invalid(v, "a color or @drawable/ reference"));
        };
        standard(w)?.view.background = Some(background);
        Ok(())
    });
    registry.register_setter(VIEW, "setElevation", |w, v| {
        standard(w)?.view.elevation = dp_amount(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setAlpha", |w, v| {
        let alpha = parse_float(v)?;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(SetterError::invalid(v, "a number between 0 and 1"));
        }
        standard(w)?.view.alpha = alpha;
        Ok(())
    });
    registry.register_setter(VIEW, "setRotation", |w, v| {
        standard(w)?.view.rotation = parse_float(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setTranslationX", |w, v| {
        standard(w)?.view.translation_x = dp_amount(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setTranslationY", |w, v| {
        standard(w)?.view.translation_y = dp_amount(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setScaleX", |w, v| {
        standard(w)?.view.scale_x = parse_float(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setScaleY", |w, v| {
        standard(w)?.view.scale_y = parse_float(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setPadding", |w, v| {
        standard(w)?.view.padding = Edges::all(dp_amount(v)?);
        Ok(())
    });
    registry.register_setter(VIEW, "setPaddingLeft", |w, v| {
        standard(w)?.view.padding.left = dp_amount(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setPaddingTop", |w, v| {
        standard(w)?.view.padding.top = dp_amount(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setPaddingRight", |w, v| {
        standard(w)?.view.padding.right = dp_amount(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setPaddingBottom", |w, v| {
        standard(w)?.view.padding.bottom = dp_amount(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setEnabled", |w, v| {
        standard(w)?.view.enabled = parse_bool(v)?;
        Ok(())
    });
    registry.register_setter(VIEW, "setVisibility", |w, v| {
        standard(w)?.view.visibility = match v.trim() {
            "visible" => Visibility::Visible,
            "invisible" => Visibility::Invisible,
            "gone" => Visibility::Gone,
            _ => return Err(SetterError::invalid(v, "visible, invisible or gone")),
        };
        Ok(())
    });
}

fn register_container_setters(registry: &mut CapabilityRegistry) {
    // Attributes a container grants its children.
    registry.register_setter(VIEW_GROUP, "setLayoutMargin", |w, v| {
        standard(w)?.view.margin = Edges::all(dp_amount(v)?);
        Ok(())
    });
    registry.register_setter(VIEW_GROUP, "setLayoutMarginLeft", |w, v| {
        standard(w)?.view.margin.left = dp_amount(v)?;
        Ok(())
    });
    registry.register_setter(VIEW_GROUP, "setLayoutMarginTop", |w, v| {
        standard(w)?.view.margin.top = dp_amount(v)?;
        Ok(())
    });
    registry.register_setter(VIEW_GROUP, "setLayoutMarginRight", |w, v| {
        standard(w)?.view.margin.right = dp_amount(v)?;
        Ok(())
    });
    registry.register_setter(VIEW_GROUP, "setLayoutMarginBottom", |w, v| {
        standard(w)?.view.margin.bottom = dp_amount(v)?;
        Ok(())
    });
    registry.register_setter(LINEAR_LAYOUT, "setLayoutWeight", |w, v| {
        standard(w)?.view.layout_weight = parse_float(v)?;
        Ok(())
    });
    registry.register_setter(LINEAR_LAYOUT, "setLayoutGravity", |w, v| {
        standard(w)?.view.layout_gravity =
            gravity::parse(v).ok_or_else(|| SetterError::invalid(v, "gravity flags"))?;
        Ok(())
    });
    registry.register_setter(FRAME_LAYOUT, "setLayoutGravity", |w, v| {
        standard(w)?.view.layout_gravity =
            gravity::parse(v).ok_or_else(|| SetterError::invalid(v, "gravity flags"))?;
        Ok(())
    });

    // The container's own attributes.
    registry.register_setter(LINEAR_LAYOUT, "setOrientation", |w, v| {
        linear_facet(w)?.orientation = match v.trim() {
            "horizontal" => LayoutAxis::Horizontal,
            "vertical" => LayoutAxis::Vertical,
            _ => return Err(SetterError::invalid(v, "horizontal or vertical")),
        };
        Ok(())
    });
    registry.register_setter(LINEAR_LAYOUT, "setGravity", |w, v| {
        linear_facet(w)?.gravity =
            gravity::parse(v).ok_or_else(|| SetterError::invalid(v, "gravity flags"))?;
        Ok(())
    });
}

fn register_text_setters(registry: &mut CapabilityRegistry) {
    registry.register_setter(TEXT_VIEW, "setText", |w, v| {
        text_facet(w)?.text = v.to_owned();
        Ok(())
    });
    registry.register_setter(TEXT_VIEW, "setTextSize", |w, v| {
        text_facet(w)?.text_size = Dimension::parse_dimension(v)?;
        Ok(())
    });
    registry.register_setter(TEXT_VIEW, "setTextColor", |w, v| {
        text_facet(w)?.text_color = Some(Color::from_hex(v)?);
        Ok(())
    });
    registry.register_setter(TEXT_VIEW, "setGravity", |w, v| {
        text_facet(w)?.gravity =
            gravity::parse(v).ok_or_else(|| SetterError::invalid(v, "gravity flags"))?;
        Ok(())
    });
    registry.register_setter(TEXT_VIEW, "setTextStyle", |w, v| {
        text_facet(w)?.text_style =
            text_style::parse(v).ok_or_else(|| SetterError::invalid(v, "normal, bold or italic"))?;
        Ok(())
    });
}

// ============================================================================
// Schema
// ============================================================================

const STANDARD_ATTRIBUTES: &str = include_str!("../assets/attributes.json");
const STANDARD_PARENT_ATTRIBUTES: &str = include_str!("../assets/parent_attributes.json");

/// The attribute schema matching the standard families.
pub fn standard_schema() -> Result<AttributeSchema, SchemaError> {
    AttributeSchema::from_json_str(STANDARD_ATTRIBUTES, STANDARD_PARENT_ATTRIBUTES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_designer_core::CapabilityError;

    fn setup() -> CapabilityRegistry {
        standard_registry()
    }

    fn widget(registry: &CapabilityRegistry, type_name: &str) -> Box<dyn Widget> {
        registry.construct(type_name).unwrap()
    }

    fn state(widget: &dyn Widget) -> &StandardWidget {
        widget.as_any().downcast_ref::<StandardWidget>().unwrap()
    }

    fn set(registry: &CapabilityRegistry, w: &mut dyn Widget, owner: &str, method: &str, value: &str) -> Result<(), SetterError> {
        let setter = registry.setter(owner, method).unwrap();
        setter(w, value)
    }

    #[test]
    fn test_dimension_parsing() {
        assert_eq!(Dimension::parse_size("match_parent").unwrap(), Dimension::MatchParent);
        assert_eq!(Dimension::parse_size("wrap_content").unwrap(), Dimension::WrapContent);
        assert_eq!(Dimension::parse_size("16dp").unwrap(), Dimension::Dp(16.0));
        assert_eq!(Dimension::parse_dimension("12.5sp").unwrap(), Dimension::Sp(12.5));
        assert!(Dimension::parse_dimension("wrap_content").is_err());
        assert!(Dimension::parse_dimension("16").is_err());
        assert!(Dimension::parse_dimension("16px").is_err());
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(
            Color::from_hex("#FF0000").unwrap(),
            Color { a: 0xFF, r: 0xFF, g: 0, b: 0 }
        );
        assert_eq!(
            Color::from_hex("#80112233").unwrap(),
            Color { a: 0x80, r: 0x11, g: 0x22, b: 0x33 }
        );
        assert!(Color::from_hex("FF0000").is_err());
        assert!(Color::from_hex("#F00").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
    }

    #[test]
    fn test_flag_parsing() {
        assert_eq!(gravity::parse("center"), Some(gravity::CENTER));
        assert_eq!(
            gravity::parse("top|center_horizontal"),
            Some(gravity::TOP | gravity::CENTER_HORIZONTAL)
        );
        assert_eq!(gravity::parse("sideways"), None);
        assert_eq!(text_style::parse("bold|italic"), Some(3));
    }

    #[test]
    fn test_facets_follow_lineage() {
        let registry = setup();
        let button = widget(&registry, BUTTON_DESIGN);
        assert!(state(button.as_ref()).text.is_some());
        assert!(state(button.as_ref()).checked.is_none());

        let check = widget(&registry, CHECK_BOX);
        assert_eq!(state(check.as_ref()).checked, Some(false));

        let linear = widget(&registry, LINEAR_LAYOUT_DESIGN);
        assert_eq!(linear.layout_axis(), Some(LayoutAxis::Horizontal));
        assert!(widget(&registry, FRAME_LAYOUT).layout_axis().is_none());
    }

    #[test]
    fn test_view_setters() {
        let registry = setup();
        let mut w = widget(&registry, VIEW);
        set(&registry, w.as_mut(), VIEW, "setLayoutWidth", "match_parent").unwrap();
        set(&registry, w.as_mut(), VIEW, "setPadding", "8dp").unwrap();
        set(&registry, w.as_mut(), VIEW, "setPaddingTop", "2dp").unwrap();
        set(&registry, w.as_mut(), VIEW, "setVisibility", "gone").unwrap();
        set(&registry, w.as_mut(), VIEW, "setBackground", "#00FF00").unwrap();
        set(&registry, w.as_mut(), VIEW, "setId", "@+id/panel").unwrap();

        let view = &state(w.as_ref()).view;
        assert_eq!(view.layout_width, Dimension::MatchParent);
        assert_eq!(view.padding.left, 8.0);
        assert_eq!(view.padding.top, 2.0);
        assert_eq!(view.visibility, Visibility::Gone);
        assert!(matches!(view.background, Some(Background::Color(_))));
        assert_eq!(view.id.as_deref(), Some("panel"));
    }

    #[test]
    fn test_orientation_changes_axis() {
        let registry = setup();
        let mut w = widget(&registry, LINEAR_LAYOUT);
        set(&registry, w.as_mut(), LINEAR_LAYOUT, "setOrientation", "vertical").unwrap();
        assert_eq!(w.layout_axis(), Some(LayoutAxis::Vertical));
        assert!(set(&registry, w.as_mut(), LINEAR_LAYOUT, "setOrientation", "diagonal").is_err());
    }

    #[test]
    fn test_facet_setter_on_wrong_family_is_unsupported() {
        let registry = setup();
        let mut w = widget(&registry, FRAME_LAYOUT);
        let err = set(&registry, w.as_mut(), TEXT_VIEW, "setText", "hi").unwrap_err();
        assert_eq!(err, SetterError::unsupported(FRAME_LAYOUT));
    }

    #[test]
    fn test_checked_setter() {
        let registry = setup();
        let mut w = widget(&registry, SWITCH);
        set(&registry, w.as_mut(), COMPOUND_BUTTON, "setChecked", "true").unwrap();
        assert_eq!(state(w.as_ref()).checked, Some(true));
        assert!(set(&registry, w.as_mut(), COMPOUND_BUTTON, "setChecked", "yes").is_err());
    }

    #[test]
    fn test_every_schema_setter_is_registered() {
        let registry = setup();
        let schema = standard_schema().unwrap();
        for &(type_name, _) in FAMILIES {
            let entries = schema
                .own_entries(type_name)
                .iter()
                .chain(schema.contributed_entries(type_name));
            for def in entries {
                assert!(
                    registry.setter(&def.owner_type, &def.method_name).is_some(),
                    "{}::{} missing for {}",
                    def.owner_type,
                    def.method_name,
                    def.name
                );
            }
        }
    }

    #[test]
    fn test_unknown_family_cannot_be_constructed() {
        let registry = setup();
        assert!(matches!(
            registry.construct("android.widget.Nope"),
            Err(CapabilityError::UnknownNodeType(_))
        ));
    }
}
