use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Icons the frontend knows how to render. Anything else is rejected on write.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum CategoryIcon {
    #[default]
    #[sea_orm(string_value = "Hash")]
    Hash,
    #[sea_orm(string_value = "Music")]
    Music,
    #[sea_orm(string_value = "Gamepad2")]
    Gamepad2,
    #[sea_orm(string_value = "Utensils")]
    Utensils,
    #[sea_orm(string_value = "Plane")]
    Plane,
    #[sea_orm(string_value = "Dumbbell")]
    Dumbbell,
    #[sea_orm(string_value = "Laugh")]
    Laugh,
    #[sea_orm(string_value = "GraduationCap")]
    GraduationCap,
    #[sea_orm(string_value = "Palette")]
    Palette,
    #[sea_orm(string_value = "Cpu")]
    Cpu,
    #[sea_orm(string_value = "Shirt")]
    Shirt,
    #[sea_orm(string_value = "PawPrint")]
    PawPrint,
    #[sea_orm(string_value = "Trophy")]
    Trophy,
    #[sea_orm(string_value = "Film")]
    Film,
    #[sea_orm(string_value = "Camera")]
    Camera,
    #[sea_orm(string_value = "Heart")]
    Heart,
    #[sea_orm(string_value = "Sparkles")]
    Sparkles,
    #[sea_orm(string_value = "Flame")]
    Flame,
}

impl CategoryIcon {
    /// Strict lookup by the icon's exact name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::try_from_value(&name.to_string()).ok()
    }
}

pub const DEFAULT_ICON_SIZE: i32 = 24;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "categories")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(rename = "_id")]
    pub internal_id: String,
    /// Stable public key, e.g. "music"
    #[sea_orm(unique)]
    pub id: String,
    pub name: String,
    pub icon: CategoryIcon,
    #[sea_orm(default_value = 24)]
    pub icon_size: i32,
    #[sea_orm(default_value = true)]
    pub is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_parse_is_strict() {
        assert_eq!(CategoryIcon::parse("Music"), Some(CategoryIcon::Music));
        assert_eq!(CategoryIcon::parse("music"), None);
        assert_eq!(CategoryIcon::parse("Skull"), None);
    }

    #[test]
    fn test_icon_serializes_as_name() {
        let json = serde_json::to_value(CategoryIcon::Gamepad2).unwrap();
        assert_eq!(json, "Gamepad2");
    }
}
