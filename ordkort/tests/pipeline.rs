use std::fs::{self, File};
use std::io::Read;

use ordkort::config::Config;
use ordkort::{Entry, VocabProcessor};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::ZipArchive;

const CONJUGATION_PAGE: &str = r#"
<html><body>
  <section id="conjugations">
    <span class="tense-title-space">Bokmål present tense</span>
    <div class="forms-wrapper">
      <div class="meta-form">går</div><div class="meta-translation">go</div>
    </div>
    <span class="tense-title-space">Bokmål past tense</span>
    <div class="forms-wrapper">
      <div class="meta-form">gikk</div><div class="meta-translation">went</div>
    </div>
    <span class="tense-title-space">Nynorsk present tense</span>
    <div class="forms-wrapper">
      <div class="meta-form">går</div><div class="meta-translation">go</div>
    </div>
  </section>
</body></html>
"#;

async fn mock_sources(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/no/g%C3%A5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CONJUGATION_PAGE))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/no/hus"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/def/g%C3%A5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<div class="definition">bevege seg til fots</div>"#),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/def/hus"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("tl", "no"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3".to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn words_become_flashcards() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");

    mock_sources(&server).await;

    let words_file = dir.path().join("words.txt");
    let dictionary_file = dir.path().join("dictionary.json");

    fs::write(&words_file, "# verbs\nGå\n\nhus\n").expect("write words");
    fs::write(
        &dictionary_file,
        r#"{"gå (gikk)": "to go", "hus": ["house", "home"]}"#,
    )
    .expect("write dictionary");

    let mut config = Config::default();
    config.words_file = words_file;
    config.dictionary_file = dictionary_file;
    config.output.json = dir.path().join("vocab.json");
    config.output.package = dir.path().join("deck.apkg");
    config.conjugation.base_url = server.uri();
    config.definition.base_url = Some(format!("{}/def/", server.uri()));
    config.audio.base_url = server.uri();
    config.audio.directory = dir.path().join("audio");

    let processor = VocabProcessor::from_config(config).expect("processor");
    let entries = processor.run().await.expect("run");

    assert_eq!(entries.len(), 2);

    let verb = &entries[0];

    assert_eq!(verb.word, "gå");
    assert_eq!(verb.pos, "verb");
    assert_eq!(verb.translation, "to go");
    assert_eq!(verb.definition, "bevege seg til fots");
    assert_eq!(verb.audio_tag, "[sound:gå.mp3]");
    assert_eq!(
        verb.conjugations
            .as_ref()
            .map(|table| table.variant_names().collect::<Vec<_>>()),
        Some(vec!["Bokmål"])
    );

    let noun = &entries[1];

    assert_eq!(noun.pos, "noun");
    assert_eq!(noun.translation, "house; home");
    assert_eq!(noun.definition, "");
    assert_eq!(noun.conjugations, None);
    assert!(dir.path().join("audio").join("hus.mp3").exists());

    let json = fs::read_to_string(dir.path().join("vocab.json")).expect("read json");
    let exported: Vec<Entry> = serde_json::from_str(&json).expect("parse json");

    assert_eq!(exported.len(), 2);
    assert_eq!(exported[0].extra(), entries[0].extra());
    assert!(json.contains("\"present\": \"går (go)\""));

    let file = File::open(dir.path().join("deck.apkg")).expect("open package");
    let mut archive = ZipArchive::new(file).expect("read package");
    let mut index = String::new();

    archive
        .by_name("media")
        .expect("media index")
        .read_to_string(&mut index)
        .expect("read media index");

    assert_eq!(index, r#"{"0":"gå.mp3","1":"hus.mp3"}"#);
    assert!(archive.by_name("collection.anki2").is_ok());
}

#[tokio::test]
async fn translation_can_be_disabled() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");

    mock_sources(&server).await;

    let words_file = dir.path().join("words.txt");

    fs::write(&words_file, "hus\n").expect("write words");

    let mut config = Config::default();
    config.words_file = words_file;
    config.dictionary_file = dir.path().join("missing.json");
    config.enable_translation = false;
    config.output.json = dir.path().join("vocab.json");
    config.output.package = dir.path().join("deck.apkg");
    config.conjugation.base_url = server.uri();
    config.definition.base_url = Some(format!("{}/def/", server.uri()));
    config.audio.enabled = false;

    let processor = VocabProcessor::from_config(config).expect("processor");
    let entries = processor.run().await.expect("run");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].translation, "");
    assert_eq!(entries[0].expression(), "hus");
    assert!(dir.path().join("deck.apkg").exists());
}

#[tokio::test]
async fn missing_dictionary_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = Config::default();

    config.dictionary_file = dir.path().join("missing.json");
    config.words_file = dir.path().join("words.txt");

    let processor = VocabProcessor::from_config(config).expect("processor");
    let result = processor.run().await;

    assert!(matches!(result, Err(ordkort::Error::EmptyDictionary)));
}
