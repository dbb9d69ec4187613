//! Friendly component aliases and the host type identifiers they stand for.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Built-in aliases, grouped by category in display order.
pub const BUILTIN_CATEGORIES: &[(&str, &[(&str, &str)])] = &[
    (
        "Parameters",
        &[
            ("point", "Param_Point"),
            ("curve", "Param_Curve"),
            ("surface", "Param_Surface"),
            ("vector", "Param_Vector"),
            ("number", "Param_Number"),
            ("geometry", "Param_Geometry"),
        ],
    ),
    (
        "UI",
        &[
            ("slider", "GH_NumberSlider"),
            ("panel", "GH_Panel"),
            ("toggle", "GH_BooleanToggle"),
            ("button", "GH_ButtonObject"),
            ("value_list", "GH_ValueList"),
        ],
    ),
    (
        "Math",
        &[
            ("addition", "OperatorAdd"),
            ("subtraction", "OperatorSubtract"),
            ("multiplication", "OperatorMultiply"),
            ("division", "OperatorDivide"),
            ("negative", "OperatorSign"),
            ("series", "Component_Series"),
            ("range", "Component_Range"),
        ],
    ),
    (
        "Lists",
        &[
            ("list_item", "Component_ListItemVariable"),
            ("shift_list", "Component_ShiftList"),
            ("relative_item", "Component_RelativeItem"),
            ("partition_list", "Component_PartitionList"),
            ("merge", "Component_MergeVariable"),
            ("explode_tree", "GH_ExplodeTreeComponent"),
            ("shift_paths", "GH_ShiftDataPathComponent"),
            ("flatten", "Component_Flatten"),
            ("graft", "Component_Graft"),
        ],
    ),
    (
        "Vectors",
        &[
            ("vector_2pt", "Component_Vector2Pt"),
            ("amplitude", "Component_VectorAmplitude"),
            ("unit_x", "Component_UnitVectorX"),
            ("unit_y", "Component_UnitVectorY"),
            ("unit_z", "Component_UnitVectorZ"),
            ("cross_product", "Component_VectorCrossProduct"),
            ("vector_display", "Component_VectorDisplay"),
            ("plane_normal", "Component_PlaneNormal"),
        ],
    ),
    (
        "Curves",
        &[
            ("line", "Component_Line"),
            ("circle", "Component_Circle"),
            ("rectangle", "Component_Rectangle"),
            ("fit_line", "Component_LineFitPoints"),
            ("end_points", "Component_EndPoints"),
        ],
    ),
    (
        "Surfaces",
        &[
            ("surface_closest_point", "Component_SurfaceClosestPoint"),
            ("evaluate_surface", "Component_EvaluateSurface"),
            ("map_to_surface", "Component_MapOntoSurface"),
            ("surface_morph", "Component_MorphToSurfaceSpace"),
        ],
    ),
    (
        "Transform",
        &[
            ("move", "Component_Move"),
            ("rotate", "Component_Rotate"),
            ("scale", "Component_Scale"),
            ("extrude", "Component_Extrude"),
        ],
    ),
    (
        "Analysis",
        &[
            ("area", "Component_AreaProperties"),
            ("length", "Component_Length"),
            ("deconstruct_point", "Component_DeconstructPoint"),
            ("deconstruct_brep", "Component_DeconstructBrep"),
            ("deconstruct_plane", "Component_DeconstructPlane"),
        ],
    ),
    (
        "Sets",
        &[
            ("create_set", "Component_CreateSet"),
            ("member_index", "Component_SetMemberIndex"),
        ],
    ),
    (
        "Other",
        &[
            ("bounding_box", "Component_BoundingBox"),
            ("construct_plane", "Component_ConstructPlane"),
            ("relay", "GH_Relay"),
        ],
    ),
];

/// Immutable alias table.
#[derive(Debug, Clone)]
pub struct ComponentTypes {
    table: HashMap<String, String>,
    extra: BTreeMap<String, String>,
}

impl ComponentTypes {
    /// The built-in table.
    pub fn builtin() -> Self {
        let table = BUILTIN_CATEGORIES
            .iter()
            .flat_map(|(_, entries)| entries.iter())
            .map(|(alias, target)| (alias.to_string(), target.to_string()))
            .collect();

        Self {
            table,
            extra: BTreeMap::new(),
        }
    }

    /// Extend with additional aliases. Later entries win over built-ins.
    pub fn with_aliases<I>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (alias, target) in aliases {
            self.table.insert(alias.clone(), target.clone());
            self.extra.insert(alias, target);
        }
        self
    }

    /// Map an alias to its host type identifier. Unknown names pass through
    /// unchanged, so host identifiers can be used directly.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.table.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.table.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Alias → identifier, sorted by alias.
    pub fn entries(&self) -> BTreeMap<&str, &str> {
        self.table
            .iter()
            .map(|(alias, target)| (alias.as_str(), target.as_str()))
            .collect()
    }

    /// Category → aliases, in display order. Configured aliases are listed
    /// under "Custom".
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = BUILTIN_CATEGORIES
            .iter()
            .map(|(name, entries)| Category {
                name: name.to_string(),
                aliases: entries.iter().map(|(alias, _)| alias.to_string()).collect(),
            })
            .collect();

        if !self.extra.is_empty() {
            categories.push(Category {
                name: "Custom".to_string(),
                aliases: self.extra.keys().cloned().collect(),
            });
        }

        categories
    }
}

impl Default for ComponentTypes {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub aliases: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_alias() {
        let types = ComponentTypes::builtin();
        assert_eq!(types.resolve("slider"), "GH_NumberSlider");
        assert_eq!(types.resolve("circle"), "Component_Circle");
        assert_eq!(types.resolve("relay"), "GH_Relay");
    }

    #[test]
    fn test_resolve_unknown_passes_through() {
        let types = ComponentTypes::builtin();
        assert_eq!(types.resolve("not_a_real_alias"), "not_a_real_alias");
        assert_eq!(types.resolve("GH_NumberSlider"), "GH_NumberSlider");
        assert_eq!(types.resolve(""), "");
    }

    #[test]
    fn test_resolve_is_stable() {
        let types = ComponentTypes::builtin();
        for _ in 0..3 {
            assert_eq!(types.resolve("panel"), "GH_Panel");
        }
    }

    #[test]
    fn test_builtin_has_no_duplicate_aliases() {
        let total: usize = BUILTIN_CATEGORIES.iter().map(|(_, e)| e.len()).sum();
        assert_eq!(ComponentTypes::builtin().len(), total);
    }

    #[test]
    fn test_custom_aliases() {
        let types = ComponentTypes::builtin().with_aliases(vec![
            ("xy_plane".to_string(), "Component_XYPlane".to_string()),
            ("slider".to_string(), "Custom_Slider".to_string()),
        ]);

        assert_eq!(types.resolve("xy_plane"), "Component_XYPlane");
        assert_eq!(types.resolve("slider"), "Custom_Slider");

        let categories = types.categories();
        let custom = categories.last().unwrap();
        assert_eq!(custom.name, "Custom");
        assert_eq!(custom.aliases, vec!["slider", "xy_plane"]);
    }

    #[test]
    fn test_categories_cover_builtin() {
        let categories = ComponentTypes::builtin().categories();
        assert_eq!(categories.len(), BUILTIN_CATEGORIES.len());
        assert_eq!(categories[1].name, "UI");
        assert!(categories[1].aliases.contains(&"slider".to_string()));
    }
}
