use chrono::{Days, NaiveDate, Utc};
use std::sync::Arc;

use library_circulation::adapters::memory::MemoryLibrary;
use library_circulation::application::{
    catalog, circulation, members, PageRequest, ServiceDependencies, ServiceError,
};
use library_circulation::domain::book::Book;
use library_circulation::domain::commands::{
    CloseBorrow, OpenBorrow, RegisterBook, RegisterMember, UpdateBook,
};
use library_circulation::domain::member::Member;
use library_circulation::domain::value_objects::BookId;
use library_circulation::ports::*;

// ============================================================================
// テスト用のヘルパー関数
// ============================================================================

/// インメモリストアを使ったサービス依存関係のセットアップ
fn setup_deps() -> ServiceDependencies {
    let library = MemoryLibrary::new();
    ServiceDependencies {
        book_store: Arc::new(library.clone()),
        member_store: Arc::new(library.clone()),
        borrow_store: Arc::new(library),
    }
}

async fn add_book(deps: &ServiceDependencies, title: &str, isbn: &str, total_copies: u32) -> Book {
    catalog::create_book(
        deps,
        RegisterBook {
            title: title.to_string(),
            author: "Test Author".to_string(),
            isbn: isbn.to_string(),
            total_copies,
        },
    )
    .await
    .unwrap()
}

async fn add_member(deps: &ServiceDependencies, name: &str, email: &str) -> Member {
    members::create_member(
        deps,
        RegisterMember {
            name: name.to_string(),
            email: email.to_string(),
        },
    )
    .await
    .unwrap()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn fetch_book(deps: &ServiceDependencies, book_id: BookId) -> Book {
    deps.book_store.get(book_id).await.unwrap().unwrap()
}

// ============================================================================
// 貸出・返却の正常系フロー
// ============================================================================

#[tokio::test]
async fn test_borrow_decrements_and_return_restores_available_copies() {
    let deps = setup_deps();
    let book = add_book(&deps, "Domain Modeling", "978-0000000001", 2).await;
    let member = add_member(&deps, "Alice", "alice@example.com").await;

    // 貸出：貸出可能数が1減る
    let view = circulation::borrow_book(
        &deps,
        OpenBorrow {
            book_id: book.book_id,
            member_id: member.member_id,
            borrowed_date: today(),
            due_date: today() + Days::new(14),
        },
    )
    .await
    .unwrap();

    assert!(view.record.is_active());
    assert_eq!(view.record.book_id, book.book_id);
    assert_eq!(view.book.as_ref().unwrap().copies.available(), 1);
    assert_eq!(fetch_book(&deps, book.book_id).await.copies.available(), 1);

    // 返却：貸出可能数が戻り、記録に返却日が付く
    let returned = circulation::return_book(
        &deps,
        CloseBorrow {
            book_id: book.book_id,
            member_id: member.member_id,
            returned_date: today(),
        },
    )
    .await
    .unwrap();

    assert!(!returned.record.is_active());
    assert_eq!(returned.record.returned_date, Some(today()));
    assert_eq!(fetch_book(&deps, book.book_id).await.copies.available(), 2);
}

#[tokio::test]
async fn test_borrow_fails_when_no_copies_available() {
    let deps = setup_deps();
    let book = add_book(&deps, "Scarce Book", "978-0000000002", 2).await;
    let alice = add_member(&deps, "Alice", "alice@example.com").await;
    let bob = add_member(&deps, "Bob", "bob@example.com").await;
    let carol = add_member(&deps, "Carol", "carol@example.com").await;

    for member in [&alice, &bob] {
        circulation::borrow_book(
            &deps,
            OpenBorrow {
                book_id: book.book_id,
                member_id: member.member_id,
                borrowed_date: today(),
                due_date: today() + Days::new(7),
            },
        )
        .await
        .unwrap();
    }

    // 2部とも貸出済みなので3件目は拒否される
    let err = circulation::borrow_book(
        &deps,
        OpenBorrow {
            book_id: book.book_id,
            member_id: carol.member_id,
            borrowed_date: today(),
            due_date: today() + Days::new(7),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::NoCopiesAvailable));
    assert_eq!(fetch_book(&deps, book.book_id).await.copies.available(), 0);
}

#[tokio::test]
async fn test_borrow_validation_happens_before_store_access() {
    let deps = setup_deps();
    let book = add_book(&deps, "Validated", "978-0000000003", 1).await;
    let member = add_member(&deps, "Alice", "alice@example.com").await;

    // 返却期限が貸出日と同じ → 拒否
    let err = circulation::borrow_book(
        &deps,
        OpenBorrow {
            book_id: book.book_id,
            member_id: member.member_id,
            borrowed_date: today(),
            due_date: today(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    // 未来の貸出日 → 拒否
    let err = circulation::borrow_book(
        &deps,
        OpenBorrow {
            book_id: book.book_id,
            member_id: member.member_id,
            borrowed_date: today() + Days::new(1),
            due_date: today() + Days::new(14),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    // どちらの失敗もストアに副作用を残さない
    assert_eq!(fetch_book(&deps, book.book_id).await.copies.available(), 1);
    let page = circulation::list_borrows(
        &deps,
        StatusFilter::All,
        Include::All,
        SortKey::BorrowedDate,
        SortOrder::Desc,
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_borrow_requires_existing_member_and_book() {
    let deps = setup_deps();
    let book = add_book(&deps, "Existing Book", "978-0000000004", 1).await;
    let member = add_member(&deps, "Alice", "alice@example.com").await;

    let err = circulation::borrow_book(
        &deps,
        OpenBorrow {
            book_id: book.book_id,
            member_id: library_circulation::domain::value_objects::MemberId::new(),
            borrowed_date: today(),
            due_date: today() + Days::new(7),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::MemberNotFound));

    let err = circulation::borrow_book(
        &deps,
        OpenBorrow {
            book_id: BookId::new(),
            member_id: member.member_id,
            borrowed_date: today(),
            due_date: today() + Days::new(7),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::BookNotFound));
}

// ============================================================================
// 返却の異常系
// ============================================================================

#[tokio::test]
async fn test_return_without_active_borrow_is_rejected() {
    let deps = setup_deps();
    let book = add_book(&deps, "Never Borrowed", "978-0000000005", 1).await;
    let member = add_member(&deps, "Alice", "alice@example.com").await;

    let err = circulation::return_book(
        &deps,
        CloseBorrow {
            book_id: book.book_id,
            member_id: member.member_id,
            returned_date: today(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::NoActiveBorrow));
}

#[tokio::test]
async fn test_double_return_is_rejected_and_counter_stays_put() {
    let deps = setup_deps();
    let book = add_book(&deps, "Once Only", "978-0000000006", 1).await;
    let member = add_member(&deps, "Alice", "alice@example.com").await;

    circulation::borrow_book(
        &deps,
        OpenBorrow {
            book_id: book.book_id,
            member_id: member.member_id,
            borrowed_date: today(),
            due_date: today() + Days::new(7),
        },
    )
    .await
    .unwrap();

    let cmd = CloseBorrow {
        book_id: book.book_id,
        member_id: member.member_id,
        returned_date: today(),
    };
    circulation::return_book(&deps, cmd.clone()).await.unwrap();

    // 2度目の返却は貸出中記録なしとして拒否され、カウンタは総数を超えない
    let err = circulation::return_book(&deps, cmd).await.unwrap_err();
    assert!(matches!(err, ServiceError::NoActiveBorrow));
    assert_eq!(fetch_book(&deps, book.book_id).await.copies.available(), 1);
}

#[tokio::test]
async fn test_return_closes_the_most_recent_active_record() {
    let deps = setup_deps();
    let book = add_book(&deps, "Borrowed Twice", "978-0000000007", 2).await;
    let member = add_member(&deps, "Alice", "alice@example.com").await;

    // 同じ会員が同じ書籍を2部借りている状態を作る
    let first_date = today() - Days::new(10);
    let second_date = today() - Days::new(2);
    for borrowed_date in [first_date, second_date] {
        circulation::borrow_book(
            &deps,
            OpenBorrow {
                book_id: book.book_id,
                member_id: member.member_id,
                borrowed_date,
                due_date: borrowed_date + Days::new(14),
            },
        )
        .await
        .unwrap();
    }

    // 返却は最も新しく作成された記録を閉じる
    let returned = circulation::return_book(
        &deps,
        CloseBorrow {
            book_id: book.book_id,
            member_id: member.member_id,
            returned_date: today(),
        },
    )
    .await
    .unwrap();
    assert_eq!(returned.record.borrowed_date, second_date);

    // 古い方の記録はまだ貸出中
    let page = circulation::member_borrows(
        &deps,
        member.member_id,
        StatusFilter::Borrowed,
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].record.borrowed_date, first_date);
}

#[tokio::test]
async fn test_racing_returns_close_a_record_only_once() {
    let deps = setup_deps();
    let book = add_book(&deps, "Contended", "978-0000000012", 3).await;
    let member = add_member(&deps, "Alice", "alice@example.com").await;

    // 同じ組に貸出中の記録が2件ある状態を作る
    for _ in 0..2 {
        circulation::borrow_book(
            &deps,
            OpenBorrow {
                book_id: book.book_id,
                member_id: member.member_id,
                borrowed_date: today(),
                due_date: today() + Days::new(7),
            },
        )
        .await
        .unwrap();
    }

    // 2つの返却が同じ最新記録を観測する
    let seen_by_first = deps
        .borrow_store
        .latest_active(book.book_id, member.member_id)
        .await
        .unwrap()
        .unwrap();
    let seen_by_second = deps
        .borrow_store
        .latest_active(book.book_id, member.member_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen_by_first.borrow_id, seen_by_second.borrow_id);

    // 書き込みに成功するのは先着の1つだけ。敗者はNoneを受け取り、
    // サービス層はカウンタに触れずにNoActiveBorrowを報告する
    assert!(deps
        .borrow_store
        .mark_returned(seen_by_first.borrow_id, today())
        .await
        .unwrap()
        .is_some());
    assert!(deps
        .borrow_store
        .mark_returned(seen_by_second.borrow_id, today())
        .await
        .unwrap()
        .is_none());
    deps.book_store.checkin_copy(book.book_id).await.unwrap();

    // total - available == 貸出中記録の件数 が保たれている
    let current = fetch_book(&deps, book.book_id).await;
    let active = deps
        .borrow_store
        .active_count_for_book(book.book_id)
        .await
        .unwrap();
    assert_eq!(u64::from(current.copies.borrowed()), active);
    assert_eq!(active, 1);
}

#[tokio::test]
async fn test_overdue_return_is_accepted() {
    let deps = setup_deps();
    let book = add_book(&deps, "Late Book", "978-0000000008", 1).await;
    let member = add_member(&deps, "Alice", "alice@example.com").await;

    // 期限をとうに過ぎた貸出
    circulation::borrow_book(
        &deps,
        OpenBorrow {
            book_id: book.book_id,
            member_id: member.member_id,
            borrowed_date: today() - Days::new(30),
            due_date: today() - Days::new(16),
        },
    )
    .await
    .unwrap();

    // 延滞していても返却は成功する
    let returned = circulation::return_book(
        &deps,
        CloseBorrow {
            book_id: book.book_id,
            member_id: member.member_id,
            returned_date: today(),
        },
    )
    .await
    .unwrap();
    assert_eq!(returned.record.returned_date, Some(today()));
}

// ============================================================================
// 蔵書数の不変条件
// ============================================================================

#[tokio::test]
async fn test_borrowed_count_always_matches_active_records() {
    let deps = setup_deps();
    let book = add_book(&deps, "Invariant Book", "978-0000000009", 3).await;
    let alice = add_member(&deps, "Alice", "alice@example.com").await;
    let bob = add_member(&deps, "Bob", "bob@example.com").await;

    for member in [&alice, &bob] {
        circulation::borrow_book(
            &deps,
            OpenBorrow {
                book_id: book.book_id,
                member_id: member.member_id,
                borrowed_date: today(),
                due_date: today() + Days::new(7),
            },
        )
        .await
        .unwrap();
    }
    circulation::return_book(
        &deps,
        CloseBorrow {
            book_id: book.book_id,
            member_id: alice.member_id,
            returned_date: today(),
        },
    )
    .await
    .unwrap();

    // total - available == 貸出中記録の件数
    let current = fetch_book(&deps, book.book_id).await;
    let active = deps
        .borrow_store
        .active_count_for_book(book.book_id)
        .await
        .unwrap();
    assert_eq!(
        u64::from(current.copies.total() - current.copies.available()),
        active
    );
}

#[tokio::test]
async fn test_delete_book_with_active_borrow_is_rejected() {
    let deps = setup_deps();
    let book = add_book(&deps, "In Circulation", "978-0000000010", 1).await;
    let member = add_member(&deps, "Alice", "alice@example.com").await;

    circulation::borrow_book(
        &deps,
        OpenBorrow {
            book_id: book.book_id,
            member_id: member.member_id,
            borrowed_date: today(),
            due_date: today() + Days::new(7),
        },
    )
    .await
    .unwrap();

    let err = catalog::delete_book(&deps, book.book_id).await.unwrap_err();
    assert!(matches!(err, ServiceError::BookHasActiveBorrows));

    // 返却後は削除できる
    circulation::return_book(
        &deps,
        CloseBorrow {
            book_id: book.book_id,
            member_id: member.member_id,
            returned_date: today(),
        },
    )
    .await
    .unwrap();
    catalog::delete_book(&deps, book.book_id).await.unwrap();
}

#[tokio::test]
async fn test_resize_total_preserves_borrowed_copies() {
    let deps = setup_deps();
    let book = add_book(&deps, "Resizable", "978-0000000011", 3).await;
    let alice = add_member(&deps, "Alice", "alice@example.com").await;
    let bob = add_member(&deps, "Bob", "bob@example.com").await;

    for member in [&alice, &bob] {
        circulation::borrow_book(
            &deps,
            OpenBorrow {
                book_id: book.book_id,
                member_id: member.member_id,
                borrowed_date: today(),
                due_date: today() + Days::new(7),
            },
        )
        .await
        .unwrap();
    }

    // 総数5へ拡大 → 貸出中2のまま貸出可能3
    let updated = catalog::update_book(
        &deps,
        book.book_id,
        UpdateBook {
            title: None,
            author: None,
            isbn: None,
            total_copies: Some(5),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.copies.total(), 5);
    assert_eq!(updated.copies.available(), 3);

    // 貸出中2冊を下回る削減は拒否される
    let err = catalog::update_book(
        &deps,
        book.book_id,
        UpdateBook {
            title: None,
            author: None,
            isbn: None,
            total_copies: Some(1),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::FewerCopiesThanBorrowed {
            new_total: 1,
            borrowed: 2
        }
    ));
}

// ============================================================================
// 一覧・検索・ページング
// ============================================================================

#[tokio::test]
async fn test_book_list_pagination() {
    let deps = setup_deps();
    for i in 0..25 {
        add_book(
            &deps,
            &format!("Book {:02}", i),
            &format!("978-1-{:04}", i),
            1,
        )
        .await;
    }

    let page = catalog::list_books(&deps, None, PageRequest::new(3, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total, 25);
    assert_eq!(page.page, 3);
    assert_eq!(page.size, 10);
    assert_eq!(page.pages, 3);
}

#[tokio::test]
async fn test_book_search_matches_title_or_author() {
    let deps = setup_deps();
    add_book(&deps, "The Rust Programming Language", "978-2-0001", 1).await;
    add_book(&deps, "Unrelated Title", "978-2-0002", 1).await;
    catalog::create_book(
        &deps,
        RegisterBook {
            title: "Systems Design".to_string(),
            author: "Ferris Rustacean".to_string(),
            isbn: "978-2-0003".to_string(),
            total_copies: 1,
        },
    )
    .await
    .unwrap();

    // 大文字小文字を無視してタイトルと著者の両方にマッチする
    let page = catalog::list_books(&deps, Some("rust".to_string()), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn test_borrow_list_sorting_and_status_filter() {
    let deps = setup_deps();
    let member = add_member(&deps, "Alice", "alice@example.com").await;
    let early = add_book(&deps, "Due Early", "978-3-0001", 1).await;
    let late = add_book(&deps, "Due Late", "978-3-0002", 1).await;

    circulation::borrow_book(
        &deps,
        OpenBorrow {
            book_id: late.book_id,
            member_id: member.member_id,
            borrowed_date: today(),
            due_date: today() + Days::new(21),
        },
    )
    .await
    .unwrap();
    circulation::borrow_book(
        &deps,
        OpenBorrow {
            book_id: early.book_id,
            member_id: member.member_id,
            borrowed_date: today(),
            due_date: today() + Days::new(7),
        },
    )
    .await
    .unwrap();
    circulation::return_book(
        &deps,
        CloseBorrow {
            book_id: late.book_id,
            member_id: member.member_id,
            returned_date: today(),
        },
    )
    .await
    .unwrap();

    // 返却期限の昇順
    let page = circulation::list_borrows(
        &deps,
        StatusFilter::All,
        Include::All,
        SortKey::DueDate,
        SortOrder::Asc,
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].record.book_id, early.book_id);
    assert_eq!(page.items[1].record.book_id, late.book_id);

    // ステータスフィルタ
    let borrowed = circulation::list_borrows(
        &deps,
        StatusFilter::Borrowed,
        Include::All,
        SortKey::BorrowedDate,
        SortOrder::Desc,
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(borrowed.total, 1);
    assert_eq!(borrowed.items[0].record.book_id, early.book_id);

    let returned = circulation::list_borrows(
        &deps,
        StatusFilter::Returned,
        Include::All,
        SortKey::BorrowedDate,
        SortOrder::Desc,
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(returned.total, 1);
    assert_eq!(returned.items[0].record.book_id, late.book_id);
}

#[tokio::test]
async fn test_borrow_list_include_controls_snapshots() {
    let deps = setup_deps();
    let member = add_member(&deps, "Alice", "alice@example.com").await;
    let book = add_book(&deps, "Snapshot Book", "978-3-0003", 1).await;

    circulation::borrow_book(
        &deps,
        OpenBorrow {
            book_id: book.book_id,
            member_id: member.member_id,
            borrowed_date: today(),
            due_date: today() + Days::new(7),
        },
    )
    .await
    .unwrap();

    let page = circulation::list_borrows(
        &deps,
        StatusFilter::All,
        Include::Book,
        SortKey::BorrowedDate,
        SortOrder::Desc,
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert!(page.items[0].book.is_some());
    assert!(page.items[0].member.is_none());

    let page = circulation::list_borrows(
        &deps,
        StatusFilter::All,
        Include::Member,
        SortKey::BorrowedDate,
        SortOrder::Desc,
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert!(page.items[0].book.is_none());
    assert!(page.items[0].member.is_some());
}

#[tokio::test]
async fn test_member_borrows_requires_existing_member() {
    let deps = setup_deps();

    let err = circulation::member_borrows(
        &deps,
        library_circulation::domain::value_objects::MemberId::new(),
        StatusFilter::All,
        PageRequest::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::MemberNotFound));
}

// ============================================================================
// 一意性制約
// ============================================================================

#[tokio::test]
async fn test_duplicate_isbn_and_email_are_rejected() {
    let deps = setup_deps();
    add_book(&deps, "Original", "978-4-0001", 1).await;
    add_member(&deps, "Alice", "alice@example.com").await;

    let err = catalog::create_book(
        &deps,
        RegisterBook {
            title: "Copycat".to_string(),
            author: "Someone Else".to_string(),
            isbn: "978-4-0001".to_string(),
            total_copies: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateIsbn(_)));

    let err = members::create_member(
        &deps,
        RegisterMember {
            name: "Alice Clone".to_string(),
            email: "alice@example.com".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateEmail(_)));
}
