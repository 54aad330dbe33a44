use chrono::Local;
use fake::{
    faker::{company::en::CompanyName, lorem::en::Sentence},
    Dummy, Fake, Faker,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::model::lab::{Lab, TABLE_NAME};

pub struct LabFactory<T: Clone> {
    modifier_one: fn(x: &Lab, ext: T) -> Lab,
    modifier_many: fn(x: &Lab, idx: usize, ext: T) -> Lab,
}

impl<T: Clone> Default for LabFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> LabFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Lab, ext: T) -> Lab) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &Lab, idx: usize, ext: T) -> Lab) {
        self.modifier_many = modifier
    }

    pub async fn generate_one(&mut self, db: &PgPool, ext: T) -> anyhow::Result<Lab> {
        let data = LabDummy::new().into_lab();
        let data = (self.modifier_one)(&data, ext);
        sqlx::query(
            format!(
                r#"INSERT INTO {} (id, school, name, research_area, description, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)"#,
                TABLE_NAME
            )
            .as_str(),
        )
        .bind(data.id)
        .bind(&data.school)
        .bind(&data.name)
        .bind(&data.research_area)
        .bind(&data.description)
        .bind(data.created_at)
        .execute(db)
        .await?;
        Ok(data)
    }

    pub async fn generate_many(
        &mut self,
        db: &PgPool,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<Lab>> {
        let mut result: Vec<Lab> = vec![];
        for idx in 0..num as usize {
            let item = LabDummy::new().into_lab();
            result.push((self.modifier_many)(&item, idx, ext.clone()));
        }
        let mut tx = db.begin().await?;
        for item in result.iter() {
            sqlx::query(
                format!(
                    r#"INSERT INTO {} (id, school, name, research_area, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)"#,
                    TABLE_NAME
                )
                .as_str(),
            )
            .bind(item.id)
            .bind(&item.school)
            .bind(&item.name)
            .bind(&item.research_area)
            .bind(&item.description)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(result)
    }
}

#[derive(Debug, Deserialize, Dummy, Clone)]
struct LabDummy {
    pub id: Uuid,
    #[dummy(faker = "CompanyName()")]
    pub name: String,
    #[dummy(faker = "Sentence(1..3)")]
    pub research_area: String,
    #[dummy(faker = "Sentence(5..12)")]
    pub description: String,
}

impl LabDummy {
    pub fn new() -> Self {
        Faker.fake::<Self>()
    }

    pub fn into_lab(self) -> Lab {
        Lab {
            id: self.id,
            school: "gt".to_string(),
            name: self.name,
            research_area: self.research_area,
            description: self.description,
            created_at: Local::now().fixed_offset(),
        }
    }
}
