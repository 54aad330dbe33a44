use fake::{
    faker::{internet::en::SafeEmail, name::en::Name},
    Dummy, Fake, Faker,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::model::professor::{Professor, TABLE_NAME};

/// Generated professors carry a random `lab_id`; point it at an existing lab
/// through a modifier before inserting.
pub struct ProfessorFactory<T: Clone> {
    modifier_one: fn(x: &Professor, ext: T) -> Professor,
    modifier_many: fn(x: &Professor, idx: usize, ext: T) -> Professor,
}

impl<T: Clone> Default for ProfessorFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ProfessorFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Professor, ext: T) -> Professor) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &Professor, idx: usize, ext: T) -> Professor) {
        self.modifier_many = modifier
    }

    pub async fn generate_one(&mut self, db: &PgPool, ext: T) -> anyhow::Result<Professor> {
        let data = ProfessorDummy::new().into_professor();
        let data = (self.modifier_one)(&data, ext);
        sqlx::query(
            format!(
                r#"INSERT INTO {} (id, lab_id, name, email, title)
        VALUES ($1, $2, $3, $4, $5)"#,
                TABLE_NAME
            )
            .as_str(),
        )
        .bind(data.id)
        .bind(data.lab_id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.title)
        .execute(db)
        .await?;
        Ok(data)
    }

    pub async fn generate_many(
        &mut self,
        db: &PgPool,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<Professor>> {
        let mut result: Vec<Professor> = vec![];
        for idx in 0..num as usize {
            let item = ProfessorDummy::new().into_professor();
            result.push((self.modifier_many)(&item, idx, ext.clone()));
        }
        let mut tx = db.begin().await?;
        for item in result.iter() {
            sqlx::query(
                format!(
                    r#"INSERT INTO {} (id, lab_id, name, email, title)
            VALUES ($1, $2, $3, $4, $5)"#,
                    TABLE_NAME
                )
                .as_str(),
            )
            .bind(item.id)
            .bind(item.lab_id)
            .bind(&item.name)
            .bind(&item.email)
            .bind(&item.title)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(result)
    }
}

#[derive(Debug, Deserialize, Dummy, Clone)]
struct ProfessorDummy {
    pub id: Uuid,
    pub lab_id: Uuid,
    #[dummy(faker = "Name()")]
    pub name: String,
    #[dummy(faker = "SafeEmail()")]
    pub email: String,
}

impl ProfessorDummy {
    pub fn new() -> Self {
        Faker.fake::<Self>()
    }

    pub fn into_professor(self) -> Professor {
        Professor {
            id: self.id,
            lab_id: self.lab_id,
            name: self.name,
            email: self.email,
            title: "Associate Professor".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use uuid::Uuid;

    use crate::{
        factory::{lab::LabFactory, professor::ProfessorFactory},
        model::professor::{Professor, TABLE_NAME},
    };

    #[sqlx::test]
    async fn test_generate_one_in_lab(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let lab = LabFactory::<()>::new().generate_one(&pool, ()).await?;

        // When
        let mut factory = ProfessorFactory::<Uuid>::new();
        factory.modified_one(|data, lab_id| Professor {
            lab_id,
            title: "Professor".to_string(),
            ..data.clone()
        });
        let professor = factory.generate_one(&pool, lab.id).await?;

        // Expect
        let res: (Uuid, String) = sqlx::query_as(
            format!(r#"SELECT lab_id, title FROM {} WHERE id = $1"#, TABLE_NAME).as_str(),
        )
        .bind(professor.id)
        .fetch_one(&pool)
        .await?;
        assert_eq!(res, (lab.id, "Professor".to_string()));
        Ok(())
    }

    #[sqlx::test]
    async fn test_generate_many_in_lab(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let lab = LabFactory::<()>::new().generate_one(&pool, ()).await?;

        // When
        let mut factory = ProfessorFactory::<Uuid>::new();
        factory.modified_many(|data, _, lab_id| Professor {
            lab_id,
            ..data.clone()
        });
        factory.generate_many(&pool, 4, lab.id).await?;

        // Expect
        let num_data: (i64,) = sqlx::query_as(
            format!(r#"SELECT COUNT(*) FROM {} WHERE lab_id = $1"#, TABLE_NAME).as_str(),
        )
        .bind(lab.id)
        .fetch_one(&pool)
        .await?;
        assert_eq!(num_data.0, 4);
        Ok(())
    }
}
