use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::is_unique_violation;
use crate::models::registration::RegisteredCourseRow;
use crate::models::{Course, EnrollmentOutcome, NewCourse, NewStudent, RegisteredCourse, Student};

pub async fn find_student_by_email(
    db: &SqlitePool,
    email: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, email, phone, password_hash, created_at, updated_at FROM students WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn student_exists(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let found: Option<(String,)> = sqlx::query_as("SELECT id FROM students WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

/// `password_hash` must already be hashed; plaintext never reaches this layer.
pub async fn insert_student(
    db: &SqlitePool,
    student: &NewStudent,
    password_hash: String,
) -> Result<Student, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO students (id, name, email, phone, password_hash, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        "#,
    )
    .bind(&id)
    .bind(&student.name)
    .bind(&student.email)
    .bind(&student.phone)
    .bind(&password_hash)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Student {
        id,
        name: student.name.clone(),
        email: student.email.clone(),
        phone: student.phone.clone(),
        password_hash,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, code, title, instructor, schedule, credits, seats, created_at, updated_at
        FROM courses
        ORDER BY rowid
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn insert_course(db: &SqlitePool, course: NewCourse) -> Result<Course, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO courses
            (id, code, title, instructor, schedule, credits, seats, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
        "#,
    )
    .bind(&id)
    .bind(&course.code)
    .bind(&course.title)
    .bind(&course.instructor)
    .bind(&course.schedule)
    .bind(course.credits)
    .bind(course.seats)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Course {
        id,
        code: course.code,
        title: course.title,
        instructor: course.instructor,
        schedule: course.schedule,
        credits: course.credits,
        seats: course.seats,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn registration_exists(
    db: &SqlitePool,
    student_id: &str,
    course_id: &str,
) -> Result<bool, sqlx::Error> {
    let found: Option<(String,)> =
        sqlx::query_as("SELECT id FROM registrations WHERE student_id = ?1 AND course_id = ?2")
            .bind(student_id)
            .bind(course_id)
            .fetch_optional(db)
            .await?;
    Ok(found.is_some())
}

/// Takes a seat and records the registration in one transaction.
///
/// The seat is claimed with a conditional decrement, so concurrent callers
/// can never drive `seats` below zero. A duplicate pair that slipped past an
/// earlier existence check is caught by the UNIQUE index and rolled back.
pub async fn enroll(
    db: &SqlitePool,
    student_id: &str,
    course_id: &str,
) -> Result<EnrollmentOutcome, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let mut tx = db.begin().await?;

    let claimed = sqlx::query(
        r#"
        UPDATE courses
        SET seats = seats - 1,
            updated_at = ?2
        WHERE id = ?1 AND seats > 0
        "#,
    )
    .bind(course_id)
    .bind(&now)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if claimed == 0 {
        tx.rollback().await?;
        return Ok(EnrollmentOutcome::NoSeats);
    }

    let inserted = sqlx::query(
        r#"
        INSERT INTO registrations (id, student_id, course_id, marks, created_at, updated_at)
        VALUES (?1, ?2, ?3, NULL, ?4, ?4)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(student_id)
    .bind(course_id)
    .bind(&now)
    .execute(&mut *tx)
    .await;

    match inserted {
        Ok(_) => {
            tx.commit().await?;
            Ok(EnrollmentOutcome::Registered)
        }
        Err(err) if is_unique_violation(&err) => {
            tx.rollback().await?;
            Ok(EnrollmentOutcome::AlreadyRegistered)
        }
        Err(err) => Err(err),
    }
}

const REGISTERED_COURSE_SELECT: &str = r#"
    SELECT
        r.id AS id,
        r.student_id AS student_id,
        r.marks AS marks,
        r.created_at AS created_at,
        r.updated_at AS updated_at,
        c.id AS course_id,
        c.code AS course_code,
        c.title AS course_title,
        c.instructor AS course_instructor,
        c.schedule AS course_schedule,
        c.credits AS course_credits,
        c.seats AS course_seats,
        c.created_at AS course_created_at,
        c.updated_at AS course_updated_at
    FROM registrations r
    JOIN courses c ON c.id = r.course_id
    WHERE r.student_id = ?
    ORDER BY r.rowid
"#;

pub async fn fetch_registered_courses(
    db: &SqlitePool,
    student_id: &str,
) -> Result<Vec<RegisteredCourse>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RegisteredCourseRow>(REGISTERED_COURSE_SELECT)
        .bind(student_id)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(RegisteredCourse::from).collect())
}

/// Returns `(registration count, credit total)` for a student.
pub async fn dashboard_totals(db: &SqlitePool, student_id: &str) -> Result<(i64, i64), sqlx::Error> {
    sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT COUNT(r.id), COALESCE(SUM(c.credits), 0)
        FROM registrations r
        JOIN courses c ON c.id = r.course_id
        WHERE r.student_id = ?
        "#,
    )
    .bind(student_id)
    .fetch_one(db)
    .await
}

/// Overwrites the marks on an existing registration. Returns false when the
/// student is not registered for the course.
pub async fn set_marks(
    db: &SqlitePool,
    student_id: &str,
    course_id: &str,
    marks: f64,
) -> Result<bool, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"
        UPDATE registrations
        SET marks = ?3,
            updated_at = ?4
        WHERE student_id = ?1 AND course_id = ?2
        "#,
    )
    .bind(student_id)
    .bind(course_id)
    .bind(marks)
    .bind(now)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            "SELECT id, code, title, instructor, schedule, credits, seats, created_at, updated_at FROM courses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    fn new_course(code: &str, credits: i64, seats: i64) -> NewCourse {
        NewCourse {
            code: code.to_string(),
            title: format!("{} title", code),
            instructor: "Dr. Okafor".to_string(),
            schedule: "Tue/Thu 10:00".to_string(),
            credits,
            seats,
        }
    }

    async fn new_student(pool: &SqlitePool, email: &str) -> Student {
        let student = NewStudent {
            name: "Mei".to_string(),
            email: email.to_string(),
            phone: "555-0199".to_string(),
            password: "secret".to_string(),
        };
        insert_student(pool, &student, "hashed".to_string())
            .await
            .expect("Failed to insert student")
    }

    #[tokio::test]
    async fn test_insert_and_fetch_course() {
        let pool = setup_test_db().await;

        let course = insert_course(&pool, new_course("MATH201", 4, 30))
            .await
            .expect("Failed to insert course");
        assert_eq!(course.code, "MATH201");
        assert_eq!(course.seats, 30);

        let courses = fetch_courses(&pool).await.expect("Failed to fetch courses");
        assert_eq!(courses, vec![course]);
    }

    #[tokio::test]
    async fn test_duplicate_course_code_is_unique_violation() {
        let pool = setup_test_db().await;

        insert_course(&pool, new_course("PHY101", 3, 10))
            .await
            .expect("Failed to insert course");
        let err = insert_course(&pool, new_course("PHY101", 2, 5))
            .await
            .expect_err("duplicate code must fail");
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let pool = setup_test_db().await;

        new_student(&pool, "mei@uni.edu").await;
        let dup = NewStudent {
            name: "Other".to_string(),
            email: "mei@uni.edu".to_string(),
            phone: "555-0000".to_string(),
            password: "x".to_string(),
        };
        let err = insert_student(&pool, &dup, "hashed".to_string())
            .await
            .expect_err("duplicate email must fail");
        assert!(is_unique_violation(&err));

        let found = find_student_by_email(&pool, "mei@uni.edu")
            .await
            .expect("lookup")
            .expect("student exists");
        assert_eq!(found.name, "Mei");
    }

    #[tokio::test]
    async fn test_enroll_claims_last_seat_once() {
        let pool = setup_test_db().await;
        let first = new_student(&pool, "a@uni.edu").await;
        let second = new_student(&pool, "b@uni.edu").await;
        let course = insert_course(&pool, new_course("CHEM110", 3, 1))
            .await
            .expect("Failed to insert course");

        let outcome = enroll(&pool, &first.id, &course.id).await.expect("enroll");
        assert_eq!(outcome, EnrollmentOutcome::Registered);

        let outcome = enroll(&pool, &second.id, &course.id).await.expect("enroll");
        assert_eq!(outcome, EnrollmentOutcome::NoSeats);

        let course = find_course_by_id(&pool, &course.id)
            .await
            .expect("lookup")
            .expect("course exists");
        assert_eq!(course.seats, 0);
    }

    #[tokio::test]
    async fn test_enroll_duplicate_rolls_back_seat() {
        let pool = setup_test_db().await;
        let student = new_student(&pool, "c@uni.edu").await;
        let course = insert_course(&pool, new_course("BIO150", 4, 5))
            .await
            .expect("Failed to insert course");

        enroll(&pool, &student.id, &course.id).await.expect("enroll");
        let outcome = enroll(&pool, &student.id, &course.id).await.expect("enroll");
        assert_eq!(outcome, EnrollmentOutcome::AlreadyRegistered);

        let course = find_course_by_id(&pool, &course.id)
            .await
            .expect("lookup")
            .expect("course exists");
        assert_eq!(course.seats, 4);
    }

    #[tokio::test]
    async fn test_enroll_unknown_course_has_no_seats() {
        let pool = setup_test_db().await;
        let student = new_student(&pool, "d@uni.edu").await;

        let outcome = enroll(&pool, &student.id, "missing").await.expect("enroll");
        assert_eq!(outcome, EnrollmentOutcome::NoSeats);
    }

    #[tokio::test]
    async fn test_marks_and_dashboard_totals() {
        let pool = setup_test_db().await;
        let student = new_student(&pool, "e@uni.edu").await;
        let algebra = insert_course(&pool, new_course("MATH101", 3, 10)).await.expect("insert");
        let physics = insert_course(&pool, new_course("PHY201", 4, 10)).await.expect("insert");

        assert_eq!(dashboard_totals(&pool, &student.id).await.expect("totals"), (0, 0));

        enroll(&pool, &student.id, &algebra.id).await.expect("enroll");
        enroll(&pool, &student.id, &physics.id).await.expect("enroll");
        assert_eq!(dashboard_totals(&pool, &student.id).await.expect("totals"), (2, 7));

        assert!(set_marks(&pool, &student.id, &algebra.id, 85.0).await.expect("marks"));
        assert!(!set_marks(&pool, &student.id, "missing", 85.0).await.expect("marks"));

        let registered = fetch_registered_courses(&pool, &student.id)
            .await
            .expect("Failed to fetch registrations");
        assert_eq!(registered.len(), 2);
        assert_eq!(registered[0].course.code, "MATH101");
        assert_eq!(registered[0].marks, Some(85.0));
        assert_eq!(registered[1].marks, None);
        assert_eq!(registered[1].course.seats, 9);
    }
}
