// 목적:
// - 카탈로그 엔터티, 검색 문서, 응답 DTO를 정의한다.
//
// 설명:
// - Work/Contributor는 관계형 저장소의 원본 형태다.
// - WorkDocument/ContributorDocument는 재색인 때마다 통째로 교체되는 파생 문서다.
// - WorkResult는 목록/검색 응답과 캐시 페이로드가 공유하는 형태다.
//
// 디자인 패턴:
// - 데이터 전송 객체(DTO).
//
// 참조:
// - src_rs/core/projection.rs
// - src_rs/index/catalog_store.rs

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub id: Uuid,
    pub name: String,
    pub tags: Vec<String>,
}

/// 연결된 기여자가 모두 로딩된 작품이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkAggregate {
    pub work: Work,
    pub contributors: Vec<Contributor>,
}

/// 연결된 작품이 모두 로딩된 기여자다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorAggregate {
    pub contributor: Contributor,
    pub works: Vec<Work>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContributorRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkRef {
    pub id: Uuid,
    pub title: String,
}

/// works 인덱스에 저장되는 비정규화 문서다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDocument {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub contributors: Vec<ContributorRef>,
}

/// contributors 인덱스에 저장되는 비정규화 문서다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorDocument {
    pub id: Uuid,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub works: Vec<WorkRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkResult {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub contributors: Vec<ContributorRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorResult {
    pub id: Uuid,
    pub name: String,
    pub tags: Vec<String>,
    pub works: Vec<WorkRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWork {
    pub title: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub contributor_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContributor {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

impl From<&Contributor> for ContributorRef {
    fn from(contributor: &Contributor) -> Self {
        Self {
            id: contributor.id,
            name: contributor.name.clone(),
        }
    }
}

impl From<&Work> for WorkRef {
    fn from(work: &Work) -> Self {
        Self {
            id: work.id,
            title: work.title.clone(),
        }
    }
}

impl From<&WorkAggregate> for WorkResult {
    fn from(aggregate: &WorkAggregate) -> Self {
        Self {
            id: aggregate.work.id,
            title: aggregate.work.title.clone(),
            description: aggregate.work.description.clone(),
            tags: aggregate.work.tags.clone(),
            contributors: aggregate
                .contributors
                .iter()
                .map(ContributorRef::from)
                .collect(),
        }
    }
}

impl From<WorkDocument> for WorkResult {
    fn from(document: WorkDocument) -> Self {
        Self {
            id: document.id,
            title: document.title,
            description: document.description,
            tags: document.tags,
            contributors: document.contributors,
        }
    }
}

/// 명시적인 null 배열을 빈 배열로 읽는다.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
