// ============================================================
// Layer 4 — COCO Annotation Parser
// ============================================================
// Reads the two annotation files COCO 2017 ships per split:
//
//   <root>/annotations/instances_{split}2017.json
//     categories:  [{ id, name, supercategory }]
//     annotations: [{ image_id, category_id, bbox, ... }]
//
//   <root>/annotations/captions_{split}2017.json
//     images:      [{ id, file_name, coco_url, ... }]
//     annotations: [{ image_id, caption }]
//
// and groups them per image into ImageRecords. Only images with
// at least one instance annotation are kept; roughly 1% of COCO
// images have no objects and therefore no topics.
//
// Reference: https://cocodataset.org/#format-data

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::domain::image_record::ImageRecord;
use crate::domain::split::Split;
use crate::domain::traits::{AnnotationSource, SplitAnnotations};

// ─── File schemas ─────────────────────────────────────────────────────────────
// Only the fields we read; serde skips the rest (bbox, segmentation, ...).

#[derive(Debug, Clone, Deserialize)]
pub struct InstancesFile {
    pub categories:  Vec<CocoCategory>,
    pub annotations: Vec<InstanceAnnotation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CocoCategory {
    pub id:   u64,
    pub name: String,
    #[serde(default)]
    pub supercategory: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstanceAnnotation {
    pub image_id:    u64,
    pub category_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionsFile {
    pub images:      Vec<CocoImage>,
    pub annotations: Vec<CaptionAnnotation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CocoImage {
    pub id:        u64,
    pub file_name: String,
    #[serde(default)]
    pub coco_url:  String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionAnnotation {
    pub image_id: u64,
    pub caption:  String,
}

// ─── Grouping ─────────────────────────────────────────────────────────────────

/// image id → category names, first-seen order, no duplicates.
pub fn group_categories(instances: &InstancesFile) -> Result<BTreeMap<u64, Vec<String>>> {
    let id_to_name: HashMap<u64, &str> = instances
        .categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut grouped: BTreeMap<u64, Vec<String>> = BTreeMap::new();
    for ann in &instances.annotations {
        let Some(&name) = id_to_name.get(&ann.category_id) else {
            bail!(
                "annotation for image {} references unknown category id {}",
                ann.image_id, ann.category_id
            );
        };
        let names = grouped.entry(ann.image_id).or_default();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    Ok(grouped)
}

/// Trim a caption and drop any embedded newlines.
pub fn clean_caption(caption: &str) -> String {
    caption.trim().split('\n').collect()
}

/// image id → captions in annotation order.
pub fn group_captions(captions: &[CaptionAnnotation]) -> BTreeMap<u64, Vec<String>> {
    let mut grouped: BTreeMap<u64, Vec<String>> = BTreeMap::new();
    for ann in captions {
        grouped.entry(ann.image_id).or_default().push(clean_caption(&ann.caption));
    }
    grouped
}

/// `http://images.cocodataset.org/val2017/000000397133.jpg` + `000000397133.jpg`
/// → `val2017/000000397133.jpg`
pub fn relative_file_name(image: &CocoImage) -> String {
    match image.coco_url.rsplit('/').nth(1) {
        Some(folder) if !folder.is_empty() => format!("{folder}/{}", image.file_name),
        _ => image.file_name.clone(),
    }
}

pub fn image_file_names(images: &[CocoImage]) -> HashMap<u64, String> {
    images.iter().map(|img| (img.id, relative_file_name(img))).collect()
}

/// category name → supercategory name
pub fn category_supercategories(categories: &[CocoCategory]) -> BTreeMap<String, String> {
    categories
        .iter()
        .map(|c| (c.name.clone(), c.supercategory.clone()))
        .collect()
}

/// Sorted, de-duplicated supercategories of a list of category names.
pub fn supercategories_of(
    categories:    &[String],
    cat_to_super:  &BTreeMap<String, String>,
) -> Vec<String> {
    categories
        .iter()
        .filter_map(|c| cat_to_super.get(c))
        .filter(|s| !s.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Join both annotation files of a split into per-image records.
pub fn build_split(instances: &InstancesFile, captions: &CaptionsFile) -> Result<SplitAnnotations> {
    let image_categories = group_categories(instances)?;
    let mut image_captions = group_captions(&captions.annotations);
    let image_files = image_file_names(&captions.images);
    let cat_to_super = category_supercategories(&instances.categories);

    let mut images  = BTreeMap::new();
    let mut skipped = 0usize;

    for (image_id, categories) in image_categories {
        let (Some(file_name), Some(caps)) = (image_files.get(&image_id), image_captions.remove(&image_id))
        else {
            skipped += 1;
            continue;
        };
        let supercategories = supercategories_of(&categories, &cat_to_super);
        images.insert(
            image_id,
            ImageRecord::new(file_name.clone(), categories, supercategories, caps),
        );
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} annotated images without captions or image entry", skipped);
    }

    Ok(SplitAnnotations {
        images,
        category_names: instances.categories.iter().map(|c| c.name.clone()).collect(),
        category_supercategory: cat_to_super,
    })
}

// ─── CocoParser ───────────────────────────────────────────────────────────────

/// Reads COCO 2017 annotation files below a dataset root.
pub struct CocoParser {
    root: PathBuf,
}

impl CocoParser {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn instances_path(&self, split: Split) -> PathBuf {
        self.root.join("annotations").join(format!("instances_{split}2017.json"))
    }

    pub fn captions_path(&self, split: Split) -> PathBuf {
        self.root.join("annotations").join(format!("captions_{split}2017.json"))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Malformed annotation file '{}'", path.display()))
}

impl AnnotationSource for CocoParser {
    fn load_split(&self, split: Split) -> Result<SplitAnnotations> {
        tracing::info!("Loading {} instances...", split);
        let instances: InstancesFile = read_json(&self.instances_path(split))?;

        tracing::info!("Loading {} captions...", split);
        let captions: CaptionsFile = read_json(&self.captions_path(split))?;

        let parsed = build_split(&instances, &captions)?;
        tracing::info!("Parsed {} {} images", parsed.images.len(), split);
        Ok(parsed)
    }
}
