// 목적:
// - 외부 I/O 호출에 취소 신호를 연결한다.
//
// 설명:
// - 취소 토큰이 먼저 발화하면 진행 중인 future를 버리고 Cancelled를 반환한다.
// - bulk 색인처럼 중간 취소를 허용하지 않는 호출에는 사용하지 않는다.
//
// 참조:
// - src_rs/core/reindex_pipeline.rs
// - src_rs/core/listing_pipeline.rs

use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::core::errors::{CoreError, CoreResult};

pub async fn run_cancellable<T, F>(cancel: &CancellationToken, stage: &str, future: F) -> CoreResult<T>
where
    F: Future<Output = CoreResult<T>>,
{
    ensure_not_cancelled(cancel, stage)?;

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CoreError::Cancelled(stage.to_string())),
        result = future => result,
    }
}

pub fn ensure_not_cancelled(cancel: &CancellationToken, stage: &str) -> CoreResult<()> {
    if cancel.is_cancelled() {
        return Err(CoreError::Cancelled(stage.to_string()));
    }
    Ok(())
}
