use crate::domain::model::{ConversionSummary, ConvertTarget};
use crate::domain::ports::DatasetConverter;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::Instant;

pub struct ConversionEngine<D: DatasetConverter> {
    converter: D,
    monitor: SystemMonitor,
}

impl<D: DatasetConverter> ConversionEngine<D> {
    pub fn new(converter: D) -> Self {
        Self::new_with_monitoring(converter, false)
    }

    pub fn new_with_monitoring(converter: D, monitor_enabled: bool) -> Self {
        Self {
            converter,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn converter(&self) -> &D {
        &self.converter
    }

    /// 依序執行各轉換目標，遇到第一個錯誤即停止
    pub fn run(&mut self, targets: &[ConvertTarget]) -> Result<Vec<ConversionSummary>> {
        tracing::info!(
            "🚀 Converting dataset '{}' ({} targets)",
            self.converter.dataset_name(),
            targets.len()
        );
        self.monitor.log_stats("Start");

        let mut summaries = Vec::with_capacity(targets.len());
        for target in targets {
            let started = Instant::now();
            tracing::info!("🔄 Converting {} file...", target);

            let summary = self.converter.convert(*target)?;
            tracing::info!(
                "✅ {}: {} rows -> {} ({:?})",
                target,
                summary.rows_written,
                summary.output_file.display(),
                started.elapsed()
            );
            self.monitor.log_stats(target.as_str());
            summaries.push(summary);
        }

        self.monitor.log_final_stats();
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ItemTable;
    use crate::domain::ports::DatasetLayout;
    use crate::utils::error::ConvertError;
    use std::cell::RefCell;
    use std::path::PathBuf;

    struct MockConverter {
        layout: DatasetLayout,
        calls: RefCell<Vec<ConvertTarget>>,
        fail_on: Option<ConvertTarget>,
    }

    impl MockConverter {
        fn new(fail_on: Option<ConvertTarget>) -> Self {
            Self {
                layout: DatasetLayout::new("in", "out", "mock"),
                calls: RefCell::new(Vec::new()),
                fail_on,
            }
        }

        fn summary(&self, target: ConvertTarget) -> Result<ConversionSummary> {
            self.calls.borrow_mut().push(target);
            if self.fail_on == Some(target) {
                return Err(ConvertError::InvalidValue {
                    field: target.to_string(),
                    value: String::new(),
                    reason: "mock failure".to_string(),
                });
            }
            Ok(ConversionSummary {
                target,
                output_file: PathBuf::from(format!("out/mock.{}", target)),
                rows_written: 1,
            })
        }
    }

    impl DatasetConverter for MockConverter {
        fn dataset_name(&self) -> &str {
            &self.layout.dataset_name
        }

        fn layout(&self) -> &DatasetLayout {
            &self.layout
        }

        fn convert_inter(&self) -> Result<ConversionSummary> {
            self.summary(ConvertTarget::Inter)
        }

        fn convert_user(&self) -> Result<ConversionSummary> {
            self.summary(ConvertTarget::User)
        }

        fn convert_item(&self) -> Result<ConversionSummary> {
            self.summary(ConvertTarget::Item)
        }

        fn load_item_data(&self) -> Result<ItemTable> {
            Ok(ItemTable::default())
        }
    }

    #[test]
    fn test_runs_targets_in_order() {
        let mut engine = ConversionEngine::new(MockConverter::new(None));
        let summaries = engine
            .run(&[ConvertTarget::User, ConvertTarget::Inter])
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].target, ConvertTarget::User);
        assert_eq!(
            *engine.converter().calls.borrow(),
            vec![ConvertTarget::User, ConvertTarget::Inter]
        );
    }

    #[test]
    fn test_stops_at_first_failure() {
        let mut engine = ConversionEngine::new(MockConverter::new(Some(ConvertTarget::Inter)));
        let result = engine.run(&ConvertTarget::ALL);

        assert!(result.is_err());
        assert_eq!(*engine.converter().calls.borrow(), vec![ConvertTarget::Inter]);
    }
}
