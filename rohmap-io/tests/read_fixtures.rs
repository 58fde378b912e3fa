use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rstest::*;

use rohmap_core::chrom_lengths::BuiltinChromLengths;
use rohmap_core::models::Genotype;
use rohmap_io::{GenotypeReadError, GenotypeTableReader};

fn get_test_path(file_name: &str) -> PathBuf {
    std::env::current_dir()
        .unwrap()
        .join("../tests/data/genotypes")
        .join(file_name)
}

#[rstest]
fn test_read_plain_table() {
    let sample = GenotypeTableReader::new(&BuiltinChromLengths)
        .read(get_test_path("affected1.txt"))
        .unwrap();

    assert_eq!(sample.name, "affected1");
    assert_eq!(sample.build.as_deref(), Some("hg19"));
    assert_eq!(sample.chromosomes(), vec!["1", "2"]);
    assert_eq!(sample.stats.total_calls, 90);
    assert_eq!(sample.stats.no_calls, 2);

    let chr1 = sample.store("1").unwrap();
    assert_eq!(chr1.len(), 60);
    assert_eq!(chr1.first_position(), Some(10_000));
    assert_eq!(chr1.last_position(), Some(600_000));
    assert_eq!(chr1.calls()[0].genotype, Genotype::HomozygousB);
    assert_eq!(chr1.calls()[0].id, "rs1000");
}

#[rstest]
fn test_gzipped_matches_plain() {
    let reader = GenotypeTableReader::new(&BuiltinChromLengths);
    let plain = reader.read(get_test_path("affected1.txt")).unwrap();
    let gz = reader.read(get_test_path("affected2.txt.gz")).unwrap();

    assert_eq!(gz.name, "affected2");
    assert_eq!(gz.store("1"), plain.store("1"));
    assert_eq!(gz.store("2"), plain.store("2"));
}

#[rstest]
fn test_read_all_keeps_order() {
    let paths = vec![
        get_test_path("unaffected1.txt"),
        get_test_path("affected1.txt"),
    ];
    let samples = GenotypeTableReader::new(&BuiltinChromLengths)
        .read_all(&paths)
        .unwrap();
    let names: Vec<&str> = samples.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["unaffected1", "affected1"]);
}

#[rstest]
fn test_quality_filter_on_fixture() {
    let sample = GenotypeTableReader::new(&BuiltinChromLengths)
        .with_quality_filter(Some(0.02))
        .read(get_test_path("affected1.txt"))
        .unwrap();
    let chr1 = sample.store("1").unwrap();
    assert!(chr1.len() < 60);
    assert!(chr1.calls().iter().all(|c| c.confidence.unwrap() <= 0.02));
}

#[rstest]
fn test_unknown_build_fixture() {
    let result = GenotypeTableReader::new(&BuiltinChromLengths).read(get_test_path("unknown_build.txt"));
    assert!(matches!(result, Err(GenotypeReadError::UnknownBuild { ref build, .. }) if build == "mm10"));
}

#[rstest]
fn test_missing_file() {
    let result = GenotypeTableReader::new(&BuiltinChromLengths).read(get_test_path("nope.txt"));
    assert!(matches!(result, Err(GenotypeReadError::Io(_))));
}
