use criterion::{Criterion, black_box, criterion_group, criterion_main};

use fieldserve_report::{MappingTable, RatFormData, build_render_ops};
use fieldserve_report::text::shape_narrative;

fn sample_form() -> RatFormData {
    let mut form = RatFormData::default();
    form.codigo_loja = "1250".into();
    form.pdv = "312".into();
    form.fsa = "FSA-20240309-77".into();
    form.mau_uso = "nao".into();
    form.problema_resolvido = "sim".into();
    form.defeito_problema = "Impressora de PDV sem imprimir cupom, erro de suprimento \
        intermitente após troca de bobina. Cliente relata falhas desde a abertura da loja."
        .into();
    form.diagnostico_testes = "Troca cruzada com PDV vizinho, limpeza da cabeça de \
        impressão, teste de ping no print server e impressão de etiqueta de teste."
        .into();
    form.solucao = "Substituída a impressora pela reserva do estoque.".into();
    form
}

fn bench_build_ops(c: &mut Criterion) {
    let form = sample_form();
    let table = MappingTable::current();
    c.bench_function("build_render_ops/full_form", |b| {
        b.iter(|| build_render_ops(black_box(&form), black_box(table), black_box(842.0)))
    });
}

fn bench_wrap(c: &mut Criterion) {
    let narrative = "linha muito longa ".repeat(64);
    c.bench_function("shape_narrative/4_lines", |b| {
        b.iter(|| shape_narrative(black_box(&narrative), 9.0, 420.0, 4))
    });
}

criterion_group!(benches, bench_build_ops, bench_wrap);
criterion_main!(benches);
