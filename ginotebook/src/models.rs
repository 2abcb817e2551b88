//! Plain records for GI Notebook resources.
//!
//! Every value is a disposable snapshot built during one fetch; there is no
//! update-in-place. A resource's `url` is its identity: two values with the
//! same `url` describe the same remote object. The instance -> scenario
//! back-reference is a non-owning [`ScenarioRef`], set when a scenario
//! attaches the instance, and is for lookup only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of GI design types tracked by the notebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GiType {
    RainGarden,
    Tree,
    GreenRoof,
}

impl GiType {
    /// Parse the canonical name reported by the `gi_types` endpoint.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Rain Garden" => Some(GiType::RainGarden),
            "Tree" => Some(GiType::Tree),
            "Green roof" => Some(GiType::GreenRoof),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GiType::RainGarden => "Rain Garden",
            GiType::Tree => "Tree",
            GiType::GreenRoof => "Green roof",
        }
    }
}

impl std::fmt::Display for GiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A RHESSys stratum default-type row: maps a notebook-side type to the
/// modeling tool's default parameter id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StratumType {
    pub id: u64,
    pub url: String,
    pub name: String,
    pub rhessys_default_id: i64,
}

/// A RHESSys soil default-type row. Same shape as [`StratumType`]; a
/// distinct type because it comes from a distinct endpoint and fills a
/// distinct slot on [`Element`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilType {
    pub id: u64,
    pub url: String,
    pub name: String,
    pub rhessys_default_id: i64,
}

/// One constituent layer of a [`Template`] (e.g. a soil layer or planting
/// stratum). Owned by exactly one template; does not point back to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub id: u64,
    pub url: String,
    pub name: String,
    pub model_3d_url: String,
    pub model_planview_url: String,
    pub soil_depth: f64,
    pub ponding_depth: f64,
    pub major_axis: f64,
    pub minor_axis: f64,
    /// Absent when the element carries no stratum constraint data.
    pub stratum_type: Option<StratumType>,
    /// Absent when the element carries no soil constraint data.
    pub soil_type: Option<SoilType>,
}

/// A reusable GI design: type, geometry assets, and its ordered elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub id: u64,
    pub url: String,
    pub name: String,
    pub gi_type: GiType,
    pub model_3d_url: String,
    pub model_planview_url: String,
    pub elements: Vec<Element>,
}

impl Template {
    /// Append an element, preserving resolution order.
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }
}

/// Non-owning identity of a [`Scenario`], used as the back-reference target
/// on attached instances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioRef {
    pub id: u64,
    pub url: String,
}

/// A single placed occurrence of a template at a geospatial location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instance {
    pub id: u64,
    pub url: String,
    /// WGS 84 placement polygon, kept as the raw GeoJSON-shaped mapping.
    pub placement_poly: Value,
    pub template: Template,
    /// Set by [`Scenario::add_instance`]; `None` until attached.
    pub scenario: Option<ScenarioRef>,
}

/// A named collection of placed GI instances within a watershed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub id: u64,
    pub url: String,
    pub name: String,
    pub description: String,
    pub immutable: bool,
    pub watershed_url: String,
    pub instances: Vec<Instance>,
}

impl Scenario {
    /// Attach an instance: set its scenario back-reference to this scenario
    /// (overwriting any prior one) and append it. No deduplication — two
    /// attach calls append twice.
    pub fn add_instance(&mut self, mut instance: Instance) {
        instance.scenario = Some(ScenarioRef {
            id: self.id,
            url: self.url.clone(),
        });
        self.instances.push(instance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template() -> Template {
        Template {
            id: 4,
            url: "https://gi/api/gi_templates/4/".to_string(),
            name: "Rain garden 1m".to_string(),
            gi_type: GiType::RainGarden,
            model_3d_url: "https://gi/m3d".to_string(),
            model_planview_url: "https://gi/mpv".to_string(),
            elements: Vec::new(),
        }
    }

    fn instance(id: u64) -> Instance {
        Instance {
            id,
            url: format!("https://gi/api/gi_instances/{id}/"),
            placement_poly: json!({"type": "Polygon", "coordinates": []}),
            template: template(),
            scenario: None,
        }
    }

    fn scenario(id: u64) -> Scenario {
        Scenario {
            id,
            url: format!("https://gi/api/gi_scenarios/{id}/"),
            name: format!("scenario {id}"),
            description: String::new(),
            immutable: false,
            watershed_url: "https://gi/api/watersheds/1/".to_string(),
            instances: Vec::new(),
        }
    }

    #[test]
    fn add_instance_sets_back_reference() {
        let mut s = scenario(7);
        s.add_instance(instance(1));
        let attached = &s.instances[0];
        let back = attached.scenario.as_ref().unwrap();
        assert_eq!(back.id, 7);
        assert_eq!(back.url, s.url);
    }

    #[test]
    fn reattach_to_second_scenario_reassigns_back_reference() {
        let mut s1 = scenario(7);
        s1.add_instance(instance(1));
        let carried = s1.instances[0].clone();

        let mut s2 = scenario(8);
        s2.add_instance(carried);
        let back = s2.instances[0].scenario.as_ref().unwrap();
        assert_eq!(back.id, 8);

        // The first scenario still holds its own copy, unchanged.
        assert_eq!(s1.instances[0].scenario.as_ref().unwrap().id, 7);
    }

    #[test]
    fn double_attach_appends_twice() {
        let mut s = scenario(7);
        let i = instance(1);
        s.add_instance(i.clone());
        s.add_instance(i);
        assert_eq!(s.instances.len(), 2);
        assert_eq!(s.instances[0].id, s.instances[1].id);
    }

    #[test]
    fn add_element_preserves_order() {
        let mut t = template();
        for id in [10, 11, 12] {
            t.add_element(Element {
                id,
                url: format!("https://gi/api/gi_elements/{id}/"),
                name: format!("element {id}"),
                model_3d_url: String::new(),
                model_planview_url: String::new(),
                soil_depth: 1.0,
                ponding_depth: 0.1,
                major_axis: 2.0,
                minor_axis: 1.0,
                stratum_type: None,
                soil_type: None,
            });
        }
        let ids: Vec<u64> = t.elements.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn gi_type_names_round_trip() {
        for t in [GiType::RainGarden, GiType::Tree, GiType::GreenRoof] {
            assert_eq!(GiType::from_name(t.name()), Some(t));
        }
        assert_eq!(GiType::from_name("Bioswale"), None);
        assert_eq!(GiType::GreenRoof.to_string(), "Green roof");
    }
}
