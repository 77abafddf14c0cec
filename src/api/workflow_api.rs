// ==========================================
// AirPlus 工艺流程聚合 - 流程 API
// ==========================================
// 职责: 串联 加载 → 聚合 → 导出 / 指标,供 CLI 与服务调用
// 每次运行生成一个 run_id,贯穿日志与 DQ 报告
// ==========================================

use crate::api::error::ApiResult;
use crate::config::WorkflowConfigReader;
use crate::domain::quality::{DqReport, DqSummary};
use crate::domain::workflow::WorkflowModel;
use crate::engine::aggregator::WorkflowAggregator;
use crate::engine::ishikawa::{IshikawaEngine, IshikawaReport};
use crate::engine::kpi::{KpiEngine, WorkflowKpis};
use crate::engine::shortage::{ShortageEngine, ShortageReport};
use crate::export::write_workflow;
use crate::importer::source_loader::{SourcePaths, WorkflowSourceLoader};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span};
use uuid::Uuid;

/// 一次流水线运行的结果
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub run_id: String,
    pub model: WorkflowModel,
    pub dq_report: DqReport,
}

/// 导出响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub run_id: String,
    pub output_path: String,
    pub stages: usize,
    pub entries: usize,
    pub employees: usize,
    pub parts: usize,
    pub dq_summary: DqSummary,
    pub elapsed_ms: u64,
}

/// 指标汇总响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub run_id: String,
    pub kpis: WorkflowKpis,
    pub shortages: ShortageReport,
    pub ishikawa: IshikawaReport,
    pub data_quality: DqReport,
}

// ==========================================
// WorkflowApi
// ==========================================
pub struct WorkflowApi {
    config: Arc<dyn WorkflowConfigReader>,
}

impl WorkflowApi {
    pub fn new(config: Arc<dyn WorkflowConfigReader>) -> Self {
        Self { config }
    }

    /// 按给定路径运行 加载 + 聚合
    pub fn build_model(&self, paths: &SourcePaths) -> ApiResult<PipelineOutput> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("workflow_run", run_id = %run_id);
        let _enter = span.enter();

        let policy = self.config.row_error_policy()?;
        let loader = WorkflowSourceLoader::with_policy(policy);
        let sources = loader.load(paths, &run_id)?;

        let model = WorkflowAggregator::new().aggregate(
            &sources.operations,
            &sources.staff,
            &sources.parts,
        );

        Ok(PipelineOutput {
            run_id,
            model,
            dq_report: sources.dq_report,
        })
    }

    /// 按配置路径运行
    pub fn run_pipeline(&self) -> ApiResult<PipelineOutput> {
        self.build_model(&SourcePaths::from_config(self.config.as_ref()))
    }

    /// 运行并导出 JSON
    ///
    /// output 为 None 时使用配置的导出路径
    pub fn export(&self, output: Option<PathBuf>) -> ApiResult<ExportResponse> {
        let started = Instant::now();
        let output_path = output.unwrap_or_else(|| self.config.export_path());

        let run = self.run_pipeline()?;
        write_workflow(&output_path, &run.model)?;

        let response = ExportResponse {
            run_id: run.run_id,
            output_path: output_path.display().to_string(),
            stages: run.model.stages.len(),
            entries: run.model.entry_count(),
            employees: run.model.employees.len(),
            parts: run.model.parts.len(),
            dq_summary: run.dq_report.summary.clone(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            run_id = %response.run_id,
            output = %response.output_path,
            elapsed_ms = response.elapsed_ms,
            "导出完成"
        );
        Ok(response)
    }

    /// 运行并计算指标与缺件
    pub fn summary(&self) -> ApiResult<WorkflowSummary> {
        let run = self.run_pipeline()?;
        self.summarize(run)
    }

    /// 对已构建的模型计算指标
    pub fn summarize(&self, run: PipelineOutput) -> ApiResult<WorkflowSummary> {
        let limit = self.config.ranking_limit()?;
        let kpis = KpiEngine::new(limit).compute(&run.model);
        let shortages = ShortageEngine::default().compute(&run.model);
        let ishikawa = IshikawaEngine::new().compute(&run.model);

        Ok(WorkflowSummary {
            run_id: run.run_id,
            kpis,
            shortages,
            ishikawa,
            data_quality: run.dq_report,
        })
    }
}
