use ndarray::ArrayD;
use rasscope::classify::{classify, Role};
use rasscope::config::ScopeConfig;
use rasscope::data::{
    Attributes, Container, ContainerReader, DataType, MemoryContainer, NodeKind, Scalar, Selection,
};
use rasscope::explorer::{analyze, explore, list_datasets, summarize_file};
use rasscope::patterns::{file_metadata, hecras_patterns, resolve, MatchStatus};
use rasscope::sampling::{preview_table, sample, SampleValue, SAMPLE_ERROR_SENTINEL};
use rasscope::{RasscopeError, Result};
use std::path::PathBuf;

const SERIES: &str =
    "/Results/Unsteady/Output/Output Blocks/Base Output/Unsteady Time Series";

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/plan.json")
}

fn open_fixture() -> Box<dyn Container> {
    ContainerReader::open(&fixture_path()).unwrap()
}

#[test]
fn structure_counts_agree_with_listing() {
    let container = open_fixture();
    let report = explore(container.as_ref(), 20);
    let inventory = list_datasets(container.as_ref());

    assert!(report.error.is_none());
    assert_eq!(report.total_groups, 14);
    assert_eq!(report.total_datasets, 8);
    assert_eq!(report.root.count_kinds(), (14, 8));
    assert_eq!(inventory.datasets.len(), report.total_datasets);
}

#[test]
fn shallow_tree_records_boundary_groups() {
    let container = open_fixture();
    let report = explore(container.as_ref(), 2);

    assert_eq!((report.total_groups, report.total_datasets), (5, 0));
    let areas = report.root.find("/Geometry/2D Flow Areas").unwrap();
    assert!(areas.children().is_empty());
}

#[test]
fn listing_is_largest_first_with_stable_ties() {
    let container = open_fixture();
    let inventory = list_datasets(container.as_ref());
    let paths: Vec<&str> = inventory.datasets.iter().map(|d| d.path.as_str()).collect();

    assert_eq!(paths[0], format!("{}/2D Flow Areas/Upper/Water Surface", SERIES));
    assert_eq!(paths[1], format!("{}/2D Flow Areas/Upper/Depth", SERIES));
    assert_eq!(paths[3], format!("{}/Time", SERIES));
    assert_eq!(paths[7], "/Geometry/2D Flow Areas/Lower/Cells FacePoint Indexes");
    assert!(inventory
        .datasets
        .windows(2)
        .all(|w| w[0].byte_size >= w[1].byte_size));
}

#[test]
fn hecras_patterns_match_every_flow_area() {
    let container = open_fixture();
    let report = resolve(container.as_ref(), &hecras_patterns().unwrap(), 10);

    for key in [
        "geometry.mesh_nodes_Upper",
        "geometry.mesh_nodes_Lower",
        "geometry.mesh_elements_Upper",
        "geometry.mesh_elements_Lower",
        "results.max_wse_Upper",
        "results.max_wse_Lower",
        "results.max_depth_Upper",
    ] {
        assert!(report.matches.contains_key(key), "missing {}", key);
    }
    assert_eq!(report.matches.len(), 7);
    assert_eq!(report.summary["geometry_terrain"], MatchStatus::NotFound);
    assert_eq!(report.summary["results_max_velocity"], MatchStatus::NotFound);
    assert_eq!(report.summary["results_max_depth"], MatchStatus::Found);

    let depth = &report.matches["results.max_depth_Upper"];
    assert!(depth.error.is_some());
    assert_eq!(
        depth.sample.values,
        vec![SampleValue::Scalar(SAMPLE_ERROR_SENTINEL.into())]
    );

    let wse = &report.matches["results.max_wse_Upper"];
    assert!(wse.error.is_none());
    assert!(wse.sample.truncated);
    assert_eq!(wse.sample.values.len(), 10);
}

#[test]
fn root_metadata() {
    let container = open_fixture();
    let meta = file_metadata(container.as_ref());
    assert_eq!(meta.file_type, "HEC-RAS Results");
    assert_eq!(meta.version, "6.5.0");
    assert_eq!(meta.created, "2024-03-14");
}

#[test]
fn roles() {
    let container = open_fixture();
    let cls = classify(container.as_ref());

    assert!(cls.error.is_none());
    assert_eq!(cls.roles.len(), 8);
    assert!(cls
        .paths(Role::Coordinates)
        .contains(&"/Geometry/2D Flow Areas/Upper/Cells Center Coordinate".to_string()));
    assert_eq!(cls.paths(Role::TimeSeries), [format!("{}/Time", SERIES)]);
    assert_eq!(
        cls.paths(Role::ScalarResults),
        [format!("{}/2D Flow Areas/Upper/Depth", SERIES)]
    );
}

#[test]
fn samples_and_tables() {
    let container = open_fixture();

    let time = sample(container.as_ref(), &format!("{}/Time", SERIES), 5);
    assert!(time.truncated);
    assert_eq!(time.values.first(), Some(&SampleValue::Scalar(0.0.into())));
    assert_eq!(time.values.last(), Some(&SampleValue::Scalar(11.5.into())));

    let table = preview_table(
        container.as_ref(),
        "/Geometry/2D Flow Areas/Lower/Cells FacePoint Indexes",
        2,
    )
    .unwrap();
    assert_eq!(table.columns, vec!["a", "b", "c", "d"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.total_rows, 3);
    assert!(table.truncated);
}

#[test]
fn file_summary_and_analysis() {
    let summary = summarize_file(&fixture_path()).unwrap();
    assert!(summary.accessible);
    assert_eq!(summary.name, "plan.json");
    assert_eq!((summary.groups_count, summary.datasets_count), (14, 8));

    let container = open_fixture();
    let config = ScopeConfig {
        top_datasets: 3,
        ..ScopeConfig::default()
    };
    let report = analyze(container.as_ref(), &config).unwrap();
    assert_eq!(report.top_datasets.len(), 3);
    assert_eq!(report.total_datasets, 8);
    assert_eq!(report.extraction.found_count(), 4);
    assert_eq!(report.metadata.version, "6.5.0");
}

/// Snapshot container that cannot report the shape of one dataset.
struct BrokenShape {
    inner: MemoryContainer,
    broken: &'static str,
}

impl Container for BrokenShape {
    fn kind(&self, path: &str) -> Result<NodeKind> {
        self.inner.kind(path)
    }

    fn exists(&self, path: &str) -> bool {
        self.inner.exists(path)
    }

    fn children(&self, path: &str) -> Result<Vec<String>> {
        self.inner.children(path)
    }

    fn attributes(&self, path: &str) -> Result<Attributes> {
        self.inner.attributes(path)
    }

    fn shape(&self, path: &str) -> Result<Vec<usize>> {
        if path == self.broken {
            return Err(RasscopeError::read("corrupt dataspace"));
        }
        self.inner.shape(path)
    }

    fn dtype(&self, path: &str) -> Result<DataType> {
        self.inner.dtype(path)
    }

    fn read(&self, path: &str, selection: &Selection) -> Result<ArrayD<Scalar>> {
        self.inner.read(path, selection)
    }
}

fn broken_shape_container() -> BrokenShape {
    let float64 = DataType::Float { bytes: 8 };
    let mut inner = MemoryContainer::new();
    inner.insert_array("/A/bad", float64, &[4, 2], vec![0.0; 8]).unwrap();
    inner.insert_array("/B/Velocity", float64, &[3], vec![1.0, 2.0, 3.0]).unwrap();
    inner.insert_array("/B/Block", float64, &[500, 3], vec![0.0; 1500]).unwrap();
    BrokenShape {
        inner,
        broken: "/A/bad",
    }
}

#[test]
fn unreadable_shape_only_drops_that_dataset() {
    let c = broken_shape_container();

    let inventory = list_datasets(&c);
    let paths: Vec<&str> = inventory.datasets.iter().map(|d| d.path.as_str()).collect();
    assert!(inventory.error.is_none());
    assert_eq!(paths, vec!["/B/Block", "/B/Velocity"]);
    assert!(inventory.unreadable["/A/bad"].contains("corrupt dataspace"));

    let classification = classify(&c);
    assert!(classification.error.is_none());
    assert_eq!(classification.paths(Role::VectorResults), ["/B/Velocity"]);
    assert_eq!(classification.paths(Role::TimeSeries), ["/B/Block"]);

    let analysis = analyze(&c, &ScopeConfig::default()).unwrap();
    assert!(analysis.error.is_none());
    assert_eq!((analysis.total_groups, analysis.total_datasets), (3, 3));
    assert_eq!(analysis.top_datasets[0].path, "/B/Block");
}
