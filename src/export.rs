// ==========================================
// AirPlus 工艺流程聚合 - 流程模型导出
// ==========================================
// 格式: UTF-8 缩进 JSON,键名与展示层约定一致
// 缺失标量写 null;空零件列表省略 pieces 键
// ==========================================

use crate::domain::workflow::WorkflowModel;
use crate::perf::PerfGuard;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("导出文件读写失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON 序列化失败 ({path}): {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type ExportResult<T> = Result<T, ExportError>;

/// 写出流程模型（父目录不存在时自动创建）
#[instrument(skip(model), fields(path = %path.display(), stages = model.stages.len()))]
pub fn write_workflow(path: &Path, model: &WorkflowModel) -> ExportResult<()> {
    let _perf = PerfGuard::new("export.write_workflow");
    let io_err = |source: std::io::Error| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, model).map_err(|source| ExportError::Json {
        path: path.display().to_string(),
        source,
    })?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    info!(entries = model.entry_count(), "流程模型已导出");
    Ok(())
}

/// 重新读取导出文件
pub fn read_workflow(path: &Path) -> ExportResult<WorkflowModel> {
    let file = File::open(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ExportError::Json {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::operation::OperationRecord;
    use crate::domain::part::PartRecord;
    use crate::domain::staff::StaffRecord;
    use crate::domain::types::WorkDuration;
    use crate::engine::aggregator::aggregate;
    use tempfile::TempDir;

    fn model() -> WorkflowModel {
        let ops = vec![
            OperationRecord::new("Assembly", 1, 2)
                .with_reference("PN-1")
                .with_durations(WorkDuration::from_hms(1, 0, 0), WorkDuration::from_hms(1, 20, 0)),
            OperationRecord::new("Test", 2, 3).with_reference("PN-404"),
        ];
        let staff = vec![StaffRecord::new("E1").named("Zoé", "Lefèvre").assigned_to("Poste 1")];
        let parts = vec![PartRecord::new("PN-1")
            .with_description("Rivet")
            .with_quantity(12.0)];
        aggregate(&ops, &staff, &parts)
    }

    #[test]
    fn test_round_trip_preserves_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("workflow_data.json");
        let original = model();

        write_workflow(&path, &original).unwrap();
        let reloaded = read_workflow(&path).unwrap();

        assert_eq!(reloaded.stages.len(), original.stages.len());
        assert_eq!(reloaded.entry_count(), original.entry_count());
        for (a, b) in original.entries().zip(reloaded.entries()) {
            assert_eq!(a.1.employees.is_empty(), b.1.employees.is_empty());
            assert_eq!(a.1.has_part(), b.1.has_part());
        }
    }

    #[test]
    fn test_document_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workflow_data.json");
        write_workflow(&path, &model()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();

        for key in ["stages", "employees", "parts", "relationships"] {
            assert!(doc.get(key).is_some(), "missing key {}", key);
        }
        let poste = &doc["stages"][0]["postes"][0];
        assert_eq!(poste["poste_id"], 1);
        assert_eq!(poste["temps_prevu"], "01:00:00");
        assert!(poste["aleas"].is_null());
        assert_eq!(poste["pieces"][0]["Code / Référence"], "PN-1");
        assert_eq!(poste["employees"][0]["Prénom"], "Zoé");
        assert!(doc["stages"][1]["postes"][0].get("pieces").is_none());

        // 非 ASCII 字符原样写出
        assert!(text.contains("Lefèvre"));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_workflow(Path::new("/no/such/workflow.json")).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
