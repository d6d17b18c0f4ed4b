//! Entity CRUD routes under `/api/v1`. Each collection is also reachable by its Portuguese name
//! (`alunos`, `disciplinas`, `notas`), which existing clients of the service use.

use crate::handlers::{courses, grades, students};
use crate::state::AppState;
use axum::{
    routing::{get, MethodRouter},
    Router,
};

/// Mount `{base}` (list, create) and `{base}/:id` (read, update, delete).
fn collection(
    router: Router<AppState>,
    base: &str,
    list: MethodRouter<AppState>,
    item: MethodRouter<AppState>,
) -> Router<AppState> {
    router.route(base, list).route(&format!("{}/:id", base), item)
}

pub fn entity_routes(state: AppState) -> Router {
    let student_list = get(students::list).post(students::create);
    let student_item = get(students::read).put(students::update).delete(students::delete);
    let course_list = get(courses::list).post(courses::create);
    let course_item = get(courses::read).put(courses::update).delete(courses::delete);
    let grade_list = get(grades::list).post(grades::create);
    let grade_item = get(grades::read).put(grades::update).delete(grades::delete);

    let mut router = Router::new();
    for (base, list, item) in [
        ("/students", &student_list, &student_item),
        ("/alunos", &student_list, &student_item),
        ("/courses", &course_list, &course_item),
        ("/disciplinas", &course_list, &course_item),
        ("/grades", &grade_list, &grade_item),
        ("/notas", &grade_list, &grade_item),
    ] {
        router = collection(router, base, list.clone(), item.clone());
    }

    router
        .route("/grades/student/:id", get(grades::by_student))
        .route("/grades/course/:id", get(grades::by_course))
        .route("/notas/aluno/:id", get(grades::by_student))
        .route("/notas/disciplina/:id", get(grades::by_course))
        .with_state(state)
}
