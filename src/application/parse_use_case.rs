// ============================================================
// Layer 2 — ParseUseCase
// ============================================================
// Offline, once per dataset download:
//
//   Step 1: Parse train annotations
//   Step 2: Parse val annotations
//   Step 3: Number categories 0..n from the train category list
//   Step 4: Write coco_raw.json

use anyhow::Result;
use std::path::PathBuf;

use crate::data::raw::CocoRaw;
use crate::domain::split::Split;
use crate::domain::traits::AnnotationSource;

pub struct ParseUseCase<S: AnnotationSource> {
    source: S,
    output: PathBuf,
}

impl<S: AnnotationSource> ParseUseCase<S> {
    pub fn new(source: S, output: impl Into<PathBuf>) -> Self {
        Self { source, output: output.into() }
    }

    pub fn execute(&self) -> Result<CocoRaw> {
        let train = self.source.load_split(Split::Train)?;
        let val   = self.source.load_split(Split::Val)?;

        // COCO ids have gaps (1..=90 for 80 categories), so renumber
        tracing::info!("Mapping categories to IDs...");
        let categories = train.category_map();
        tracing::info!("{} categories", categories.len());

        let raw = CocoRaw::new(
            train.images,
            val.images,
            categories,
            train.category_supercategory,
        );

        tracing::info!("Saving raw dataset...");
        raw.save(&self.output)?;
        tracing::info!("Data saved to '{}'", self.output.display());
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image_record::ImageRecord;
    use crate::domain::traits::SplitAnnotations;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    struct InMemory;

    impl AnnotationSource for InMemory {
        fn load_split(&self, split: Split) -> Result<SplitAnnotations> {
            let mut images = BTreeMap::new();
            let id = match split { Split::Train => 1, Split::Val => 2 };
            images.insert(id, ImageRecord::new(
                format!("{split}2017/{id}.jpg"),
                vec!["cat".into()],
                vec!["animal".into()],
                vec!["A cat.".into()],
            ));
            Ok(SplitAnnotations {
                images,
                // val lists categories in a different order; train wins
                category_names: match split {
                    Split::Train => vec!["person".into(), "cat".into()],
                    Split::Val => vec!["cat".into(), "person".into()],
                },
                category_supercategory: BTreeMap::from([
                    ("person".to_string(), "person".to_string()),
                    ("cat".to_string(), "animal".to_string()),
                ]),
            })
        }
    }

    #[test]
    fn test_writes_both_splits_and_train_category_order() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("coco_raw.json");
        let raw  = ParseUseCase::new(InMemory, &path).execute().unwrap();

        assert!(path.exists());
        assert_eq!(raw.images_data_train.keys().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(raw.images_data_val.keys().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(raw.category_id["person"], 0);
        assert_eq!(raw.id_category[&1], "cat");
        assert_eq!(CocoRaw::load(&path).unwrap(), raw);
    }
}
