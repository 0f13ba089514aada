// UTF-8 safety through the full indexing path

use crate::common::{create_test_services, TestLibrary};

#[test]
fn test_index_multibyte_document() {
    let text = "Das Mädchen läuft über die Straße. 東京は日本の首都です。 🚀 launch ✨ done. "
        .repeat(20);
    let library = TestLibrary::with_files(&[("mixed.txt", &text)]);
    let ts = create_test_services();

    let result = ts.services.indexer.index_document(&library.file("mixed.txt"));

    assert!(result.success, "{}", result.message);
    assert!(result.chunks_created > 1);
}

#[test]
fn test_multibyte_search_previews_are_valid() {
    let text = "🎉 Celebration emoji party 🎊 with confetti 🎈 balloons. ".repeat(20);
    let library = TestLibrary::with_files(&[("party.txt", &text)]);
    let ts = create_test_services();
    ts.services.indexer.index_document(&library.file("party.txt"));

    let response = ts.services.search.search("emoji party", Some(3));

    assert!(response.success);
    for source in &response.sources {
        assert!(source.preview.chars().count() <= 103);
    }
}
