use orienteer_utils::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Episode {
    tours: Vec<Vec<usize>>,
    seed: String,
}

#[test]
fn test_jsonify_sorts_keys() {
    let value = json!({"b": 1, "a": {"d": [{"z": 0, "y": 1}], "c": 2}});
    assert_eq!(
        jsonify(&value).unwrap(),
        r#"{"a":{"c":2,"d":[{"y":1,"z":0}]},"b":1}"#
    );
}

#[test]
fn test_dejsonify() {
    let episode: Episode = dejsonify(r#"{"seed":"abc","tours":[[1,0],[0]]}"#).unwrap();
    assert_eq!(
        episode,
        Episode {
            tours: vec![vec![1, 0], vec![0]],
            seed: "abc".to_string()
        }
    );
    assert!(dejsonify::<Episode>(r#"{"seed":1}"#).is_err());
}

#[test]
fn test_compress_obj() {
    let episode = Episode {
        tours: vec![vec![3, 5, 0]; 64],
        seed: "orienteering".to_string(),
    };
    let compressed = compress_obj(&episode).unwrap();
    assert!(compressed.len() < jsonify(&episode).unwrap().len());
    assert_eq!(decompress_obj::<Episode>(&compressed).unwrap(), episode);

    let hex_str = compress_obj_hex(&episode).unwrap();
    assert_eq!(decompress_obj_hex::<Episode>(&hex_str).unwrap(), episode);
    assert!(decompress_obj_hex::<Episode>("not hex").is_err());
}
