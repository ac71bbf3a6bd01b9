use criterion::{criterion_group, criterion_main, Criterion};

use mailfiler::model::event::RouteRequest;
use mailfiler::model::rule::KeywordTable;
use mailfiler::store::MemoryStore;
use mailfiler::EmailAttachmentRouter;

fn sample_email(attachments: usize) -> Vec<u8> {
    let mut out = String::from(
        "Subject: CS260\r\nMIME-Version: 1.0\r\nContent-Type: multipart/mixed; boundary=\"b\"\r\n\r\n\
--b\r\nContent-Type: text/plain\r\n\r\nWeekly materials.\r\n",
    );
    for i in 0..attachments {
        let name = match i % 3 {
            0 => format!("Lecture{i:02}.pdf"),
            1 => format!("HW{i}_solutions.pdf"),
            _ => format!("reading{i}.pdf"),
        };
        out.push_str(&format!(
            "--b\r\nContent-Type: application/pdf\r\nContent-Disposition: attachment; filename=\"{name}\"\r\n\
Content-Transfer-Encoding: base64\r\n\r\nJVBERi0xLjQKJcfsj6IK\r\n"
        ));
    }
    out.push_str("--b--\r\n");
    out.into_bytes()
}

fn bench_route(c: &mut Criterion) {
    let request = RouteRequest::from_raw_email(&sample_email(30));
    let router = EmailAttachmentRouter::new(MemoryStore::new(), "bench");

    c.bench_function("route_30_attachments", |b| b.iter(|| router.route(&request)));
}

fn bench_classify(c: &mut Criterion) {
    let table = KeywordTable::default();
    c.bench_function("classify_filename", |b| {
        b.iter(|| table.classify("Final Written Assignment - Part 2 (revised).docx"))
    });
}

criterion_group!(benches, bench_route, bench_classify);
criterion_main!(benches);
