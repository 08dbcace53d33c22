use rusqlite::Row;
use sea_query::{Expr, Iden, Order, Query, SqliteQueryBuilder};
use sea_query_rusqlite::{RusqliteBinder, RusqliteValues};

use crate::{
    ctx::BaseParams,
    db::{self, DB},
    Error, Result,
};

use super::{CreateNote, Note, NoteId, UpdateNote};

#[derive(Iden, Clone, Copy)]
pub enum Notes {
    Table,
    Id,
    Title,
    Content,
    UserId,
    CreatedAt,
    UpdatedAt,
}

const COLUMNS: [Notes; 3] = [Notes::Id, Notes::Title, Notes::Content];

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
        })
    }
}

/// Runs a statement that yields exactly one note row.
async fn query_note(db: &DB, (sql, values): (String, RusqliteValues)) -> Result<Note> {
    db.call(move |conn| {
        conn.query_row(&sql, &*values.as_params(), |row| Note::try_from(row))
            .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
    .map_err(Error::from)
}

pub async fn find_notes(BaseParams { db, ctx }: BaseParams) -> Result<Vec<Note>> {
    let (sql, values) = Query::select()
        .columns(COLUMNS)
        .from(Notes::Table)
        .and_where(Expr::col(Notes::UserId).eq(ctx.user_id()))
        .order_by(Notes::Id, Order::Asc)
        .build_rusqlite(SqliteQueryBuilder);

    db.call(move |conn| {
        let notes = conn
            .prepare(&sql)?
            .query_map(&*values.as_params(), |row| Note::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn create_note(args: CreateNote, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    args.validate()?;
    let CreateNote { title, content } = args;

    let query = Query::insert()
        .into_table(Notes::Table)
        .columns([Notes::Title, Notes::Content, Notes::UserId])
        .values_panic([title.into(), content.into(), ctx.user_id().into()])
        .returning(Query::returning().columns(COLUMNS))
        .build_rusqlite(SqliteQueryBuilder);

    let note = query_note(&db, query).await?;
    tracing::info!("user {} created note {}", ctx.user_id(), note.id);
    Ok(note)
}

pub async fn get_note(note_id: NoteId, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let query = Query::select()
        .columns(COLUMNS)
        .from(Notes::Table)
        .and_where(Expr::col(Notes::Id).eq(note_id))
        .and_where(Expr::col(Notes::UserId).eq(ctx.user_id()))
        .build_rusqlite(SqliteQueryBuilder);

    query_note(&db, query).await
}

pub async fn update_note(note_id: NoteId, args: UpdateNote, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    args.validate()?;
    let UpdateNote { title, content } = args;

    let query = Query::update()
        .table(Notes::Table)
        .values([
            (Notes::Title, title.into()),
            (Notes::Content, content.into()),
            (Notes::UpdatedAt, chrono::Utc::now().into()),
        ])
        .and_where(Expr::col(Notes::Id).eq(note_id))
        .and_where(Expr::col(Notes::UserId).eq(ctx.user_id()))
        .returning(Query::returning().columns(COLUMNS))
        .build_rusqlite(SqliteQueryBuilder);

    let note = query_note(&db, query).await?;
    tracing::info!("user {} updated note {}", ctx.user_id(), note.id);
    Ok(note)
}

pub async fn delete_note(note_id: NoteId, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let query = Query::delete()
        .from_table(Notes::Table)
        .and_where(Expr::col(Notes::Id).eq(note_id))
        .and_where(Expr::col(Notes::UserId).eq(ctx.user_id()))
        .returning(Query::returning().columns(COLUMNS))
        .build_rusqlite(SqliteQueryBuilder);

    let note = query_note(&db, query).await?;
    tracing::info!("user {} deleted note {}", ctx.user_id(), note.id);
    Ok(note)
}
