use std::fs;

use symbols::{Analysis, AnalysisMode, AnalyzerOptions, FileAnalyzer};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_analyze_symbols() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "App.tsx", b"export const App = () => <Layout/>;\n");

    let digest = FileAnalyzer::default().symbols(&path);
    assert_eq!(digest.defined_components, vec!["App"]);
    assert_eq!(digest.used_components, vec!["Layout"]);
}

#[test]
fn test_analyze_outline_modes() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "math.ts", b"export function add(a: number, b: number) {\n  return a + b;\n}\n");
    let analyzer = FileAnalyzer::default();

    match analyzer.analyze(&path, AnalysisMode::Signatures) {
        Analysis::Outline(outline) => {
            assert_eq!(outline.lines, vec!["export function add(a: number, b: number)"])
        }
        other => panic!("unexpected analysis: {other:?}"),
    }
    match analyzer.analyze(&path, AnalysisMode::Skeleton) {
        Analysis::Outline(outline) => {
            assert_eq!(outline.lines, vec!["export function add(a: number, b: number) { … }"])
        }
        other => panic!("unexpected analysis: {other:?}"),
    }
}

#[test]
fn test_error_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.js", b")))(((");

    let digest = FileAnalyzer::default().symbols(&path);
    let error = digest.error.unwrap();
    assert!(error.contains("bad.js"), "{error}");
}

#[test]
fn test_oversized_file_is_not_parsed() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "big.js", &vec![b' '; 2048]);
    let analyzer = FileAnalyzer::new(AnalyzerOptions::new().max_file_bytes(1024));

    let analysis = analyzer.analyze(&path, AnalysisMode::Symbols);
    assert!(analysis.error().unwrap().contains("byte limit"));
}

#[test]
fn test_non_utf8_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "latin1.js", &[0x63, 0x6f, 0x6e, 0x73, 0x74, 0xff, 0xfe]);

    let analysis = FileAnalyzer::default().analyze(&path, AnalysisMode::Skeleton);
    assert!(analysis.error().unwrap().contains("UTF-8"));
}

#[test]
fn test_missing_and_unsupported_files() {
    let dir = TempDir::new().unwrap();
    let analyzer = FileAnalyzer::default();

    let missing = analyzer.analyze(&dir.path().join("gone.ts"), AnalysisMode::Symbols);
    assert!(missing.error().is_some());

    let notes = write(&dir, "notes.md", b"# notes");
    let unsupported = analyzer.analyze(&notes, AnalysisMode::Symbols);
    assert!(unsupported.error().unwrap().contains("unsupported"));
}

#[test]
fn test_symbols_reports_read_failures() {
    let dir = TempDir::new().unwrap();
    let analyzer = FileAnalyzer::default();

    let missing = analyzer.symbols(&dir.path().join("gone.tsx"));
    assert!(missing.is_failed());
    assert!(missing.error.unwrap().contains("gone.tsx"));

    let path = write(&dir, "big.ts", &vec![b' '; 64]);
    let small = FileAnalyzer::new(AnalyzerOptions::new().max_file_bytes(8));
    assert!(small.symbols(&path).error.unwrap().contains("byte limit"));
}
