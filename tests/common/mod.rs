#![allow(dead_code)]

// Shared fixtures for the integration tests: a miniature COCO
// 2017 layout with three categories.

use serde_json::{json, Value};
use std::{fs, path::Path};

pub const CATEGORIES: [(u64, &str, &str); 3] = [
    (1, "person", "person"),
    (18, "dog", "animal"),
    (17, "cat", "animal"),
];

/// (image id, COCO category ids) per split
pub fn images(split: &str) -> Vec<(u64, Vec<u64>)> {
    match split {
        "train" => vec![
            (1, vec![1]),
            (2, vec![18, 18]),
            (3, vec![17, 1]),
            (4, vec![18, 17]),
            (5, vec![1, 18]),
            (6, vec![17]),
        ],
        _ => vec![(101, vec![18]), (102, vec![1, 17])],
    }
}

fn instances(split: &str) -> Value {
    let categories: Vec<Value> = CATEGORIES
        .iter()
        .map(|(id, name, sup)| json!({ "id": id, "name": name, "supercategory": sup }))
        .collect();
    let mut annotations = Vec::new();
    let mut ann_id = 0;
    for (image_id, cats) in images(split) {
        for cat in cats {
            ann_id += 1;
            annotations.push(json!({
                "id": ann_id, "image_id": image_id, "category_id": cat,
                "bbox": [0.0, 0.0, 1.0, 1.0], "area": 1.0, "iscrowd": 0
            }));
        }
    }
    json!({ "info": {}, "licenses": [], "images": [], "categories": categories, "annotations": annotations })
}

fn captions(split: &str) -> Value {
    let mut imgs = Vec::new();
    let mut annotations = Vec::new();
    for (image_id, _) in images(split) {
        let file_name = format!("{image_id:012}.jpg");
        imgs.push(json!({
            "id": image_id,
            "file_name": file_name,
            "coco_url": format!("http://images.cocodataset.org/{split}2017/{file_name}"),
            "height": 480, "width": 640
        }));
        annotations.push(json!({ "id": image_id * 10, "image_id": image_id, "caption": format!("Picture number {image_id}.\n") }));
        annotations.push(json!({ "id": image_id * 10 + 1, "image_id": image_id, "caption": " Another view. " }));
    }
    json!({ "images": imgs, "annotations": annotations })
}

/// Write annotations/{instances,captions}_{split}2017.json under `root`.
pub fn write_coco(root: &Path) {
    let dir = root.join("annotations");
    fs::create_dir_all(&dir).unwrap();
    for split in ["train", "val"] {
        fs::write(dir.join(format!("instances_{split}2017.json")), instances(split).to_string()).unwrap();
        fs::write(dir.join(format!("captions_{split}2017.json")), captions(split).to_string()).unwrap();
    }
}
