use anyhow::Result;
use rec_convert::{
    ConversionEngine, ConvertError, ConvertOptions, ConvertTarget, DatasetConverter, DatasetLayout,
    IdentifierMap, TimeZoneMode, YelpDataset,
};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const REVIEW_FILE: &str = "yelp_academic_dataset_review.json";
const BUSINESS_FILE: &str = "yelp_academic_dataset_business.json";
const USER_FILE: &str = "yelp_academic_dataset_user.json";

fn write_jsonl(dir: &Path, name: &str, records: &[serde_json::Value]) -> Result<()> {
    let body: Vec<String> = records.iter().map(|r| r.to_string()).collect();
    fs::write(dir.join(name), body.join("\n") + "\n")?;
    Ok(())
}

fn review(id: &str, user: &str, business: &str, stars: f64, date: &str) -> serde_json::Value {
    json!({
        "review_id": id,
        "user_id": user,
        "business_id": business,
        "stars": stars,
        "useful": 1,
        "funny": 0,
        "cool": 0,
        "text": "Great tacos.\nWould come back.",
        "date": date
    })
}

fn business(id: &str, name: &str) -> serde_json::Value {
    json!({
        "business_id": id,
        "name": name,
        "address": "1 Main St",
        "city": "Phoenix",
        "state": "AZ",
        "postal_code": "85001",
        "latitude": 33.45,
        "longitude": -112.07,
        "stars": 4.5,
        "review_count": 12,
        "is_open": 1,
        "attributes": {"WiFi": "free"},
        "categories": "Mexican, Tacos"
    })
}

fn user(id: &str, since: &str) -> serde_json::Value {
    json!({
        "user_id": id,
        "name": "Ana",
        "review_count": 3,
        "yelping_since": since,
        "useful": 5,
        "funny": 1,
        "cool": 2,
        "elite": "2018,2019",
        "friends": "u2, u3",
        "fans": 0,
        "average_stars": 3.67,
        "compliment_hot": 0,
        "compliment_more": 0,
        "compliment_profile": 0,
        "compliment_cute": 0,
        "compliment_list": 0,
        "compliment_note": 1,
        "compliment_plain": 0,
        "compliment_cool": 0,
        "compliment_funny": 0,
        "compliment_writer": 0,
        "compliment_photos": 0
    })
}

struct Fixture {
    _input: TempDir,
    output: TempDir,
    layout: DatasetLayout,
}

impl Fixture {
    fn new() -> Result<Self> {
        let input = TempDir::new()?;
        let output = TempDir::new()?;
        let layout = DatasetLayout::new(input.path(), output.path(), "yelp");
        Ok(Self {
            _input: input,
            output,
            layout,
        })
    }

    fn input(&self) -> &Path {
        &self.layout.input_path
    }

    fn dataset(&self, reuse_index: bool) -> Result<YelpDataset> {
        let options = ConvertOptions {
            time_zone: TimeZoneMode::Utc,
            reuse_index,
            show_progress: false,
        };
        Ok(YelpDataset::new(self.layout.clone(), options)?)
    }

    fn read_output(&self, name: &str) -> Result<String> {
        Ok(fs::read_to_string(self.output.path().join(name))?)
    }
}

#[test]
fn test_inter_conversion_end_to_end() -> Result<()> {
    let fixture = Fixture::new()?;
    write_jsonl(
        fixture.input(),
        REVIEW_FILE,
        &[
            review("r1", "u1", "b1", 5.0, "2015-01-01 10:00:00"),
            review("r2", "u2", "b1", 3.0, "2015-01-02 00:00:00"),
            review("r3", "u1", "b2", 1.0, "2015-01-03 00:00:00"),
        ],
    )?;

    let dataset = fixture.dataset(false)?;
    let summary = dataset.convert_inter()?;
    assert_eq!(summary.rows_written, 3);

    let content = fixture.read_output("yelp.inter")?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "review_id:token\tuser_id:token\tbusiness_id:token\tstars:float\tuseful:float\tfunny:float\tcool:float\tdate:float"
    );
    assert_eq!(lines[1], "r1\t1\t1\t2\t1\t0\t0\t1420106400");
    assert_eq!(lines[2], "r2\t2\t1\t1\t1\t0\t0\t1420156800");
    assert_eq!(lines[3], "r3\t1\t2\t0\t1\t0\t0\t1420243200");

    for line in &lines {
        assert_eq!(line.split('\t').count(), 8);
    }

    assert_eq!(fixture.read_output("yelpuser2index")?, "u1\t1\nu2\t2\n");
    assert_eq!(fixture.read_output("yelpitem2index")?, "b1\t1\nb2\t2\n");

    Ok(())
}

#[test]
fn test_user_conversion_renames_header() -> Result<()> {
    let fixture = Fixture::new()?;
    write_jsonl(
        fixture.input(),
        USER_FILE,
        &[user("u1", "2015-01-01 10:00:00"), user("u2", "2016-06-30 23:59:59")],
    )?;

    let dataset = fixture.dataset(false)?;
    let summary = dataset.convert_user()?;
    assert_eq!(summary.target, ConvertTarget::User);
    assert_eq!(summary.rows_written, 2);

    let content = fixture.read_output("yelp.user")?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);

    let header: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(header.len(), 21);
    assert_eq!(header[1], "user_name:token");
    assert_eq!(header[2], "user_review_count:float");
    assert_eq!(header[4], "user_useful:float");
    assert!(!lines[0].contains("friends"));

    let first: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(first.len(), 21);
    assert_eq!(first[0], "u1");
    assert_eq!(first[1], "Ana");
    assert_eq!(first[3], "1420106400");
    assert_eq!(first[7], "2018,2019");
    assert_eq!(first[9], "3.67");

    Ok(())
}

#[test]
fn test_item_conversion_and_loading() -> Result<()> {
    let fixture = Fixture::new()?;
    write_jsonl(
        fixture.input(),
        BUSINESS_FILE,
        &[business("b1", "Taco Stand"), business("b2", "Noodle\tBar")],
    )?;

    let dataset = fixture.dataset(false)?;
    let summary = dataset.convert_item()?;
    assert_eq!(summary.rows_written, 2);

    let content = fixture.read_output("yelp.item")?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("business_id:token\titem_name:token_seq\t"));
    assert!(lines[0].contains("item_stars:float\titem_review_count:float"));
    assert!(!lines[0].contains("attributes"));
    assert_eq!(
        lines[1],
        "b1\tTaco Stand\t1 Main St\tPhoenix\tAZ\t85001\t33.45\t-112.07\t4.5\t12\t1\tMexican, Tacos"
    );
    assert!(lines[2].starts_with("b2\tNoodle Bar\t"));

    let table = dataset.load_item_data()?;
    assert_eq!(table.len(), 2);
    assert!(table.columns.contains(&"attributes".to_string()));
    assert_eq!(table.get(1, "business_id"), Some(&json!("b2")));

    Ok(())
}

#[test]
fn test_reuse_index_seeds_identifier_maps() -> Result<()> {
    let fixture = Fixture::new()?;
    fs::write(fixture.output.path().join("yelpuser2index"), "u9\t1\nu1\t2\n")?;
    write_jsonl(
        fixture.input(),
        REVIEW_FILE,
        &[
            review("r1", "u1", "b1", 4.0, "2015-01-01 10:00:00"),
            review("r2", "u3", "b1", 2.0, "2015-01-01 10:00:00"),
        ],
    )?;

    let dataset = fixture.dataset(true)?;
    dataset.convert_inter()?;

    let content = fixture.read_output("yelp.inter")?;
    let rows: Vec<Vec<&str>> = content.lines().skip(1).map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows[0][1], "2");
    assert_eq!(rows[1][1], "3");
    assert_eq!(rows[0][2], "1");

    let users = IdentifierMap::load_from(&fixture.output.path().join("yelpuser2index"))?;
    assert_eq!(users.len(), 3);
    assert_eq!(users.get("u9"), Some(1));
    assert_eq!(users.get("u3"), Some(3));

    Ok(())
}

#[test]
fn test_engine_runs_all_targets() -> Result<()> {
    let fixture = Fixture::new()?;
    write_jsonl(
        fixture.input(),
        REVIEW_FILE,
        &[review("r1", "u1", "b1", 5.0, "2015-01-01 10:00:00")],
    )?;
    write_jsonl(fixture.input(), BUSINESS_FILE, &[business("b1", "Taco Stand")])?;
    write_jsonl(fixture.input(), USER_FILE, &[user("u1", "2015-01-01 10:00:00")])?;

    let mut engine = ConversionEngine::new(fixture.dataset(false)?);
    let summaries = engine.run(&ConvertTarget::ALL)?;

    assert_eq!(summaries.len(), 3);
    for summary in &summaries {
        assert_eq!(summary.rows_written, 1);
        assert!(summary.output_file.exists());
    }

    Ok(())
}

#[test]
fn test_malformed_line_is_fatal() -> Result<()> {
    let fixture = Fixture::new()?;
    let good = review("r1", "u1", "b1", 5.0, "2015-01-01 10:00:00").to_string();
    fs::write(
        fixture.input().join(REVIEW_FILE),
        format!("{}\n{{\"review_id\": \"r2\",\n", good),
    )?;

    let err = fixture.dataset(false)?.convert_inter().unwrap_err();
    assert!(matches!(err, ConvertError::JsonParse { line: 2, .. }));

    Ok(())
}

#[test]
fn test_bad_date_is_fatal() -> Result<()> {
    let fixture = Fixture::new()?;
    write_jsonl(
        fixture.input(),
        REVIEW_FILE,
        &[review("r1", "u1", "b1", 5.0, "2015/01/01")],
    )?;

    let err = fixture.dataset(false)?.convert_inter().unwrap_err();
    assert!(matches!(err, ConvertError::DateFormat { line: 1, .. }));

    Ok(())
}

#[test]
fn test_missing_field_is_fatal() -> Result<()> {
    let fixture = Fixture::new()?;
    let mut incomplete = review("r1", "u1", "b1", 5.0, "2015-01-01 10:00:00");
    if let Some(map) = incomplete.as_object_mut() {
        map.remove("cool");
    }
    write_jsonl(fixture.input(), REVIEW_FILE, &[incomplete])?;

    let err = fixture.dataset(false)?.convert_inter().unwrap_err();
    assert!(matches!(err, ConvertError::MissingField { ref field, .. } if field == "cool"));

    Ok(())
}

#[test]
fn test_missing_input_file() -> Result<()> {
    let fixture = Fixture::new()?;
    let err = fixture.dataset(false)?.convert_user().unwrap_err();
    assert!(matches!(err, ConvertError::IoError(_)));

    Ok(())
}
