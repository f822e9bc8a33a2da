//! RON data loader
//!
//! Loads game data from an external RON file, with fallback to built-in defaults.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use super::defaults;
use super::lookup::GameData;
use super::tables::{
    BonusEntry, ContentTuning, Curve, Enchantment, GemProperties, ScalingStatDistribution,
};
use super::template::{ItemEffect, ItemTemplate};

/// On-disk layout of a game data file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataFile {
    #[serde(default)]
    pub templates: Vec<ItemTemplate>,
    #[serde(default)]
    pub bonus_lists: BTreeMap<u32, Vec<BonusEntry>>,
    #[serde(default)]
    pub curves: BTreeMap<u32, Curve>,
    #[serde(default)]
    pub scaling_distributions: Vec<ScalingStatDistribution>,
    #[serde(default)]
    pub content_tunings: Vec<ContentTuning>,
    #[serde(default)]
    pub gem_properties: Vec<GemProperties>,
    #[serde(default)]
    pub enchantments: Vec<Enchantment>,
    #[serde(default)]
    pub item_effects: Vec<ItemEffect>,
    /// Relic item-level delta to bonus list id
    #[serde(default)]
    pub relic_bonus_lists: BTreeMap<i32, u32>,
}

/// In-memory catalog of all item-related game data
#[derive(Debug, Clone, Default)]
pub struct DataManager {
    templates: HashMap<u32, Arc<ItemTemplate>>,
    bonus_lists: HashMap<u32, Vec<BonusEntry>>,
    curves: HashMap<u32, Curve>,
    scaling_distributions: HashMap<u32, ScalingStatDistribution>,
    content_tunings: HashMap<u32, ContentTuning>,
    gem_properties: HashMap<u32, GemProperties>,
    enchantments: HashMap<u32, Enchantment>,
    item_effects: HashMap<u32, ItemEffect>,
    relic_bonus_lists: HashMap<i32, u32>,
}

impl DataManager {
    /// Empty catalog
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from `path` if given, falling back to the built-in content
    pub fn new(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load_file(path).unwrap_or_else(|e| {
                log::warn!("Failed to load game data from {:?}: {}. Using defaults.", path, e);
                Self::builtin()
            }),
            None => Self::builtin(),
        }
    }

    /// Built-in content set
    pub fn builtin() -> Self {
        Self::from_file_data(defaults::default_data_file())
    }

    /// Load a RON data file
    pub fn load_file(path: &Path) -> Result<Self, DataError> {
        let content = fs::read_to_string(path)?;
        let file: DataFile = ron::from_str(&content)?;
        let manager = Self::from_file_data(file);
        log::info!(
            "Loaded {} item templates and {} bonus lists from {:?}",
            manager.templates.len(),
            manager.bonus_lists.len(),
            path
        );
        Ok(manager)
    }

    pub fn from_file_data(file: DataFile) -> Self {
        let mut manager = Self::empty();
        for template in file.templates {
            manager.insert_template(template);
        }
        manager.bonus_lists.extend(file.bonus_lists);
        manager.curves.extend(file.curves);
        for ssd in file.scaling_distributions {
            manager.scaling_distributions.insert(ssd.id, ssd);
        }
        for tuning in file.content_tunings {
            manager.content_tunings.insert(tuning.id, tuning);
        }
        for gem in file.gem_properties {
            manager.gem_properties.insert(gem.id, gem);
        }
        for enchant in file.enchantments {
            manager.enchantments.insert(enchant.id, enchant);
        }
        for effect in file.item_effects {
            manager.item_effects.insert(effect.id, effect);
        }
        manager.relic_bonus_lists.extend(file.relic_bonus_lists);
        manager
    }

    /// Snapshot the catalog back into its file layout, sorted by id
    pub fn to_file_data(&self) -> DataFile {
        fn sorted<T: Clone>(map: &HashMap<u32, T>) -> Vec<T> {
            let mut entries: Vec<(&u32, &T)> = map.iter().collect();
            entries.sort_by_key(|(id, _)| **id);
            entries.into_iter().map(|(_, v)| v.clone()).collect()
        }

        let mut templates: Vec<ItemTemplate> =
            self.templates.values().map(|t| t.as_ref().clone()).collect();
        templates.sort_by_key(|t| t.id);

        DataFile {
            templates,
            bonus_lists: self.bonus_lists.iter().map(|(k, v)| (*k, v.clone())).collect(),
            curves: self.curves.iter().map(|(k, v)| (*k, v.clone())).collect(),
            scaling_distributions: sorted(&self.scaling_distributions),
            content_tunings: sorted(&self.content_tunings),
            gem_properties: sorted(&self.gem_properties),
            enchantments: sorted(&self.enchantments),
            item_effects: sorted(&self.item_effects),
            relic_bonus_lists: self.relic_bonus_lists.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }

    /// Write the catalog to `path` as pretty RON
    pub fn export_ron(&self, path: &Path) -> Result<(), DataError> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let text = ron::ser::to_string_pretty(&self.to_file_data(), ron::ser::PrettyConfig::default())?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn insert_template(&mut self, template: ItemTemplate) -> &mut Self {
        self.templates.insert(template.id, Arc::new(template));
        self
    }

    pub fn insert_bonus_list(&mut self, id: u32, entries: Vec<BonusEntry>) -> &mut Self {
        self.bonus_lists.insert(id, entries);
        self
    }

    pub fn insert_curve(&mut self, id: u32, curve: Curve) -> &mut Self {
        self.curves.insert(id, curve);
        self
    }

    pub fn insert_scaling_distribution(&mut self, ssd: ScalingStatDistribution) -> &mut Self {
        self.scaling_distributions.insert(ssd.id, ssd);
        self
    }

    pub fn insert_content_tuning(&mut self, tuning: ContentTuning) -> &mut Self {
        self.content_tunings.insert(tuning.id, tuning);
        self
    }

    pub fn insert_gem_properties(&mut self, gem: GemProperties) -> &mut Self {
        self.gem_properties.insert(gem.id, gem);
        self
    }

    pub fn insert_enchantment(&mut self, enchant: Enchantment) -> &mut Self {
        self.enchantments.insert(enchant.id, enchant);
        self
    }

    pub fn insert_item_effect(&mut self, effect: ItemEffect) -> &mut Self {
        self.item_effects.insert(effect.id, effect);
        self
    }

    pub fn insert_relic_bonus_list(&mut self, delta: i32, bonus_list_id: u32) -> &mut Self {
        self.relic_bonus_lists.insert(delta, bonus_list_id);
        self
    }
}

impl GameData for DataManager {
    fn item_template(&self, id: u32) -> Option<Arc<ItemTemplate>> {
        self.templates.get(&id).cloned()
    }

    fn bonus_list(&self, id: u32) -> Option<&[BonusEntry]> {
        self.bonus_lists.get(&id).map(Vec::as_slice)
    }

    fn curve_value(&self, curve_id: u32, x: f32) -> f32 {
        self.curves.get(&curve_id).map(|c| c.value_at(x)).unwrap_or(0.0)
    }

    fn scaling_distribution(&self, id: u32) -> Option<&ScalingStatDistribution> {
        self.scaling_distributions.get(&id)
    }

    fn content_tuning(&self, id: u32) -> Option<&ContentTuning> {
        self.content_tunings.get(&id)
    }

    fn gem_properties(&self, id: u32) -> Option<&GemProperties> {
        self.gem_properties.get(&id)
    }

    fn enchantment(&self, id: u32) -> Option<&Enchantment> {
        self.enchantments.get(&id)
    }

    fn item_effect(&self, id: u32) -> Option<&ItemEffect> {
        self.item_effects.get(&id)
    }

    fn relic_bonus_list_for_delta(&self, delta: i32) -> Option<u32> {
        self.relic_bonus_lists.get(&delta).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tables::CurveKind;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("itemforge-{}-{}", std::process::id(), name));
        path
    }

    #[test]
    fn test_builtin_data_is_populated() {
        let data = DataManager::builtin();
        assert!(data.template_count() > 0, "No item templates loaded");
        assert!(data.bonus_list(defaults::BONUS_HEROIC).is_some());
        assert!(data.item_template(defaults::TEMPLATE_LONGSWORD).is_some());
    }

    #[test]
    fn test_export_and_reload() {
        let path = temp_path("export.ron");
        let data = DataManager::builtin();
        data.export_ron(&path).expect("export failed");

        let reloaded = DataManager::load_file(&path).expect("reload failed");
        assert_eq!(reloaded.template_count(), data.template_count());
        assert_eq!(
            reloaded.bonus_list(defaults::BONUS_MYTHIC),
            data.bonus_list(defaults::BONUS_MYTHIC)
        );
        assert_eq!(
            reloaded.item_template(defaults::TEMPLATE_HELM),
            data.item_template(defaults::TEMPLATE_HELM)
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let data = DataManager::new(Some(Path::new("/nonexistent/itemforge/items.ron")));
        assert_eq!(data.template_count(), DataManager::builtin().template_count());
    }

    #[test]
    fn test_unknown_lookups() {
        let mut data = DataManager::empty();
        data.insert_curve(7, Curve::new(CurveKind::Linear, vec![(1.0, 10.0), (3.0, 30.0)]));

        assert_eq!(data.curve_value(7, 2.0), 20.0);
        assert_eq!(data.curve_value(8, 2.0), 0.0);
        assert!(data.bonus_list(1).is_none());
        assert!(data.item_template(1).is_none());
    }

    #[test]
    fn test_item_content_tuning_respects_disabled_flag() {
        let mut data = DataManager::empty();
        data.insert_content_tuning(ContentTuning { id: 1, min_level: 10, max_level: 20, disabled_for_item: false });
        data.insert_content_tuning(ContentTuning { id: 2, min_level: 10, max_level: 20, disabled_for_item: true });

        assert!(data.item_content_tuning(1).is_some());
        assert!(data.item_content_tuning(2).is_none());
        assert!(data.content_tuning(2).is_some());
    }
}
