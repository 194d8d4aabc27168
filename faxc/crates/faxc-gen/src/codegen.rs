//! NASM code generation: walks the statement/expression tree and emits
//! x86-64 System V assembly text.
//!
//! One `CodeGenerator` compiles the whole program in a single pass. There
//! is no separate IR: every `Expr` lowers directly to a [`GenValue`]
//! describing where its result lives, and every instruction sequence is
//! appended straight into a growable `.text` buffer. Floating constants and
//! compile-time-folded float conversions go into a parallel `.data` buffer,
//! concatenated after `.text` once the whole program has compiled.

use faxc_par::{BinOp, Expr, LiteralValue, Program, Stmt, UnOp};
use faxc_sem::{
    binary_expression_resulting_type, classify_conversion, Conversion, DataType, LocalVariable, LoopLabels,
    LoopStack, ScopeStack,
};
use faxc_util::diagnostic::DiagnosticCode;
use faxc_util::{Handler, Span, Symbol};

use crate::error::{CodeGenError, Result};
use crate::registers::{GpRegister, SimdRegister, SimdRegisterPool};
use crate::temp::{StackLayout, TempPool};
use crate::value::{GenValue, Location};

pub struct CodeGenerator<'a> {
    text: String,
    data: String,
    handler: &'a Handler,
    stack: StackLayout,
    temps: TempPool,
    simd: SimdRegisterPool,
    scopes: ScopeStack,
    loops: LoopStack,
    label_counter: u32,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            text: String::new(),
            data: String::new(),
            handler,
            stack: StackLayout::new(),
            temps: TempPool::new(),
            simd: SimdRegisterPool::new(),
            scopes: ScopeStack::new(),
            loops: LoopStack::new(),
            label_counter: 0,
        }
    }

    /// Compiles the whole program, returning the complete NASM source text
    /// (`.text` followed by `.data`). Fails only when the SIMD register
    /// pool is exhausted; every other kind of bad input is a recoverable
    /// diagnostic reported through `Handler` instead.
    pub fn generate(mut self, program: &Program) -> Result<String> {
        tracing::trace!(statements = program.len(), "generating code");
        self.text.push_str("section .text\n");
        self.text.push_str("global _start\n");
        self.text.push_str("_start:\n");
        self.emit("mov rbp, rsp");
        for stmt in program {
            self.compile_statement(stmt)?;
        }
        self.emit_program_exit();

        let mut out = self.text;
        out.push_str("section .data\n");
        out.push_str(&self.data);
        Ok(out)
    }

    // ---- emission primitives ------------------------------------------

    fn emit(&mut self, line: impl AsRef<str>) {
        self.text.push('\t');
        self.text.push_str(line.as_ref());
        self.text.push('\n');
    }

    fn emit_label(&mut self, label: &str) {
        self.text.push_str(label);
        self.text.push_str(":\n");
    }

    fn fresh_label(&mut self) -> u32 {
        let n = self.label_counter;
        self.label_counter += 1;
        n
    }

    fn emit_program_exit(&mut self) {
        self.emit("mov rdi, rax");
        self.emit("mov rax, 60");
        self.emit("syscall");
    }

    fn emit_float_constant(&mut self, value: f64, ty: &DataType) -> u32 {
        let label = self.fresh_label();
        let directive = if matches!(ty, DataType::Float) { "dd" } else { "dq" };
        self.data.push_str(&format!(".L{label}: {directive} {}\n", format_float_literal(value)));
        label
    }

    /// Spells `loc` as a sized NASM operand.
    fn emit_result(&self, loc: &Location, ty: &DataType) -> String {
        let width = ty.size().max(1);
        match loc {
            Location::IntConstant(v) => v.to_string(),
            Location::BaseOffset(n) => format!("{} [rbp-{}]", size_keyword(width), n),
            Location::Temp(i) => format!("{} [rbp-{}]", size_keyword(width), self.temps.offset_of(*i)),
            Location::Label(n) | Location::FloatConstant(n) => format!("{} [.L{}]", size_keyword(width), n),
        }
    }

    fn allocate_temp(&mut self, ty: DataType) -> GenValue {
        let index = self.temps.allocate(&mut self.stack, ty.clone());
        GenValue::new(ty, Location::Temp(index))
    }

    /// Returns `value`'s stack slot to the temp pool if it occupies one:
    /// every `Temp` is freed exactly once, by whichever operation consumes
    /// or discards its result. A `BaseOffset`/constant/label `GenValue`
    /// isn't pool-owned, so this is a no-op for those.
    fn free_if_is_temp(&mut self, value: &GenValue) {
        if let Some(index) = value.temp_index() {
            self.temps.free(index);
        }
    }

    fn load_into_simd(&mut self, value: &GenValue) -> Result<SimdRegister> {
        let reg = self.simd.allocate().ok_or(CodeGenError::SimdRegisterPoolExhausted)?;
        let mov = if matches!(value.data_type, DataType::Float) { "movss" } else { "movsd" };
        self.emit(format!("{mov} {}, {}", reg.name(), self.emit_result(&value.location, &value.data_type)));
        Ok(reg)
    }

    fn store_simd_to_temp(&mut self, reg: SimdRegister, temp: &GenValue) {
        let mov = if matches!(temp.data_type, DataType::Float) { "movss" } else { "movsd" };
        self.emit(format!("{mov} {}, {}", self.emit_result(&temp.location, &temp.data_type), reg.name()));
    }

    /// Ensures `value` occupies a stack slot (`BaseOffset`/`Temp`), copying
    /// it there through `rax` if it's currently a bare constant or label.
    fn materialize(&mut self, value: GenValue) -> GenValue {
        match value.location {
            Location::BaseOffset(_) | Location::Temp(_) => value,
            _ => {
                let width = value.data_type.size().max(1);
                let reg = GpRegister::Rax.name(width);
                self.emit(format!("mov {reg}, {}", self.emit_result(&value.location, &value.data_type)));
                let temp = self.allocate_temp(value.data_type.clone());
                self.emit(format!("mov {}, {reg}", self.emit_result(&temp.location, &temp.data_type)));
                temp
            }
        }
    }

    fn stack_offset_of(&self, loc: &Location) -> u32 {
        match loc {
            Location::BaseOffset(n) => *n,
            Location::Temp(i) => self.temps.offset_of(*i),
            _ => unreachable!("materialize guarantees a stack location"),
        }
    }

    // ---- statements ------------------------------------------------------

    /// Baseline-resets the SIMD pool at the top of every statement: no
    /// float value is expected to outlive the statement that produced it
    /// in a register.
    fn compile_statement(&mut self, stmt: &Stmt) -> Result<()> {
        self.simd.reset_to_baseline();
        match stmt {
            Stmt::Expr(expr) => {
                let value = self.compile_expression(expr)?;
                self.free_if_is_temp(&value);
            }
            Stmt::VarDecl { name, data_type, init, span } => {
                self.compile_var_decl(*name, data_type, init, *span)?
            }
            Stmt::Return { value, span } => self.compile_return(value, *span)?,
            Stmt::Block(stmts) => self.compile_block(stmts)?,
            Stmt::If { cond, then_branch, else_branch, span } => {
                self.compile_if(cond, then_branch, else_branch.as_deref(), *span)?
            }
            Stmt::While { cond, body, span } => self.compile_while(cond, body, *span)?,
            Stmt::Break { span } => self.compile_break(*span),
            Stmt::Continue { span } => self.compile_continue(*span),
            Stmt::Putchar { value, span } => self.compile_putchar(value, *span)?,
        }
        Ok(())
    }

    fn compile_var_decl(&mut self, name: Symbol, data_type: &DataType, init: &Option<Expr>, span: Span) -> Result<()> {
        let declared_type = if data_type.is_error() {
            DataType::Error
        } else if is_supported_scalar(data_type) {
            data_type.clone()
        } else {
            self.report_unsupported_type(span, data_type);
            DataType::Error
        };

        if declared_type.is_error() {
            if let Some(init) = init {
                self.compile_expression(init)?;
            }
            self.scopes.declare(name, LocalVariable { data_type: DataType::Error, base_offset: 0 });
            return Ok(());
        }

        let offset = self.stack.alloc(declared_type.size().max(1));
        if !self.scopes.declare(name, LocalVariable { data_type: declared_type.clone(), base_offset: offset }) {
            self.report_redeclaration(span, name);
        }

        if let Some(init) = init {
            let value = self.compile_expression(init)?;
            if !value.is_error() {
                let converted = self.convert_to_type(value, &declared_type, span)?;
                let width = declared_type.size().max(1);
                let reg = GpRegister::Rax.name(width);
                self.emit(format!("mov {reg}, {}", self.emit_result(&converted.location, &converted.data_type)));
                self.emit(format!("mov {}, {reg}", self.emit_result(&Location::BaseOffset(offset), &declared_type)));
                self.free_if_is_temp(&converted);
            }
        }
        Ok(())
    }

    fn compile_return(&mut self, value: &Option<Expr>, span: Span) -> Result<()> {
        match value {
            Some(expr) => {
                let result = self.compile_expression(expr)?;
                if result.is_error() {
                    self.emit("xor eax, eax");
                } else {
                    let as_int = self.convert_to_type(result, &DataType::int(), span)?;
                    // A compile-time constant loads straight into the full
                    // 64-bit accumulator (`return 42;` -> `mov rax, 42`);
                    // anything living in memory keeps its declared operand
                    // width, since a size-mismatched `mov` would be illegal,
                    // and a 32-bit write already zero-extends into the upper
                    // half of `rax`.
                    if let Location::IntConstant(v) = as_int.location {
                        self.emit(format!("mov rax, {v}"));
                    } else {
                        let width = as_int.data_type.size().max(1);
                        self.emit(format!(
                            "mov {}, {}",
                            GpRegister::Rax.name(width),
                            self.emit_result(&as_int.location, &as_int.data_type)
                        ));
                    }
                    self.free_if_is_temp(&as_int);
                }
            }
            None => self.emit("xor eax, eax"),
        }
        // `return` only loads the result into `rax`; the process-exit
        // syscall is emitted once, after the whole program, by `generate`.
        Ok(())
    }

    fn compile_block(&mut self, stmts: &[Stmt]) -> Result<()> {
        self.scopes.push_block();
        for stmt in stmts {
            self.compile_statement(stmt)?;
        }
        self.scopes.pop_block();
        Ok(())
    }

    fn compile_if(&mut self, cond: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>, _span: Span) -> Result<()> {
        let value = self.compile_expression(cond)?;
        if value.is_error() {
            return Ok(());
        }
        self.load_truth_into_eax(&value)?;
        self.free_if_is_temp(&value);
        self.emit("cmp eax, 0");

        if let Some(else_branch) = else_branch {
            let else_label = self.fresh_label();
            let end_label = self.fresh_label();
            self.emit(format!("je .L{else_label}"));
            self.compile_statement(then_branch)?;
            self.emit(format!("jmp .L{end_label}"));
            self.emit_label(&format!(".L{else_label}"));
            self.compile_statement(else_branch)?;
            self.emit_label(&format!(".L{end_label}"));
        } else {
            let end_label = self.fresh_label();
            self.emit(format!("je .L{end_label}"));
            self.compile_statement(then_branch)?;
            self.emit_label(&format!(".L{end_label}"));
        }
        Ok(())
    }

    fn compile_while(&mut self, cond: &Expr, body: &Stmt, _span: Span) -> Result<()> {
        let start = self.fresh_label();
        let end = self.fresh_label();
        let start_label = format!(".L{start}");
        let end_label = format!(".L{end}");

        self.emit_label(&start_label);
        let value = self.compile_expression(cond)?;
        if !value.is_error() {
            self.load_truth_into_eax(&value)?;
            self.free_if_is_temp(&value);
            self.emit("cmp eax, 0");
            self.emit(format!("je {end_label}"));
        }

        self.loops.push(LoopLabels { start_label: start_label.clone(), end_label: end_label.clone() });
        self.compile_statement(body)?;
        self.loops.pop();

        self.emit(format!("jmp {start_label}"));
        self.emit_label(&end_label);
        Ok(())
    }

    fn compile_break(&mut self, span: Span) {
        match self.loops.current() {
            Some(labels) => {
                let end = labels.end_label.clone();
                self.emit(format!("jmp {end}"));
            }
            None => self.report_loop_control_outside_loop(span, "break"),
        }
    }

    fn compile_continue(&mut self, span: Span) {
        match self.loops.current() {
            Some(labels) => {
                let start = labels.start_label.clone();
                self.emit(format!("jmp {start}"));
            }
            None => self.report_loop_control_outside_loop(span, "continue"),
        }
    }

    /// `putchar(expr)`: write the single converted byte via the `write(2)`
    /// syscall (fd=1, len=1, buffer is the byte's own stack slot).
    fn compile_putchar(&mut self, value: &Expr, span: Span) -> Result<()> {
        let result = self.compile_expression(value)?;
        if result.is_error() {
            return Ok(());
        }
        let as_char = self.convert_to_type(result, &DataType::char_ty(), span)?;
        let materialized = self.materialize(as_char);
        let offset = self.stack_offset_of(&materialized.location);
        self.emit(format!("lea rsi, [rbp-{offset}]"));
        self.emit("mov rax, 1");
        self.emit("mov rdi, 1");
        self.emit("mov rdx, 1");
        self.emit("syscall");
        self.free_if_is_temp(&materialized);
        Ok(())
    }

    // ---- expressions -----------------------------------------------------

    fn compile_expression(&mut self, expr: &Expr) -> Result<GenValue> {
        Ok(match expr {
            Expr::Literal { value, data_type, .. } => match value {
                LiteralValue::Int(v) => GenValue::new(data_type.clone(), Location::IntConstant(*v)),
                LiteralValue::Float(v) => {
                    let label = self.emit_float_constant(*v, data_type);
                    GenValue::new(data_type.clone(), Location::Label(label))
                }
            },
            Expr::Identifier { name, span } => match self.scopes.lookup(*name) {
                Some(var) => GenValue::new(var.data_type.clone(), Location::BaseOffset(var.base_offset)),
                None => {
                    self.report_undeclared(*span, *name);
                    GenValue::error()
                }
            },
            Expr::Grouping { inner, .. } => return self.compile_expression(inner),
            Expr::Unary { op, operand, span } => self.compile_unary(*op, operand, *span)?,
            Expr::Cast { target, operand, span } => {
                let value = self.compile_expression(operand)?;
                self.convert_to_type(value, target, *span)?
            }
            Expr::Binary { op, left, right, span } => self.compile_binary(*op, left, right, *span)?,
            Expr::Assignment { target, value, span } => self.compile_assignment(target, value, *span)?,
            Expr::Error { .. } => GenValue::error(),
        })
    }

    fn compile_unary(&mut self, op: UnOp, operand: &Expr, span: Span) -> Result<GenValue> {
        let value = self.compile_expression(operand)?;
        if value.is_error() {
            return Ok(value);
        }
        Ok(match op {
            UnOp::Plus => value,
            UnOp::Minus if value.data_type.is_float() => {
                let src = self.load_into_simd(&value)?;
                self.free_if_is_temp(&value);
                let zero = self.simd.allocate().ok_or(CodeGenError::SimdRegisterPoolExhausted)?;
                self.emit(format!("pxor {}, {}", zero.name(), zero.name()));
                let sub = if matches!(value.data_type, DataType::Float) { "subss" } else { "subsd" };
                self.emit(format!("{sub} {}, {}", zero.name(), src.name()));
                let temp = self.allocate_temp(value.data_type.clone());
                self.store_simd_to_temp(zero, &temp);
                self.simd.free(zero);
                self.simd.free(src);
                temp
            }
            UnOp::Minus => {
                if let Location::IntConstant(v) = value.location {
                    return Ok(GenValue::new(value.data_type, Location::IntConstant(-v)));
                }
                if !value.data_type.is_integer() {
                    self.report_bad_operand_types(span, &value.data_type, &value.data_type);
                    return Ok(GenValue::error());
                }
                let width = value.data_type.size().max(1);
                let reg = GpRegister::Rax.name(width);
                self.emit(format!("mov {reg}, {}", self.emit_result(&value.location, &value.data_type)));
                self.emit(format!("neg {reg}"));
                self.free_if_is_temp(&value);
                let temp = self.allocate_temp(value.data_type.clone());
                self.emit(format!("mov {}, {reg}", self.emit_result(&temp.location, &temp.data_type)));
                temp
            }
        })
    }

    fn compile_binary(&mut self, op: BinOp, left: &Expr, right: &Expr, span: Span) -> Result<GenValue> {
        if matches!(op, BinOp::LogAnd) {
            return self.compile_logical(true, left, right);
        }
        if matches!(op, BinOp::LogOr) {
            return self.compile_logical(false, left, right);
        }

        let lhs = self.compile_expression(left)?;
        let rhs = self.compile_expression(right)?;
        if lhs.is_error() || rhs.is_error() {
            return Ok(GenValue::error());
        }

        let result_type = binary_expression_resulting_type(&lhs.data_type, &rhs.data_type);
        if result_type.is_error() {
            self.report_bad_operand_types(span, &lhs.data_type, &rhs.data_type);
            return Ok(GenValue::error());
        }
        let lhs = self.convert_to_type(lhs, &result_type, span)?;
        let rhs = self.convert_to_type(rhs, &result_type, span)?;
        if lhs.is_error() || rhs.is_error() {
            return Ok(GenValue::error());
        }

        Ok(match op {
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge | BinOp::EqEq | BinOp::NotEq => {
                self.compile_comparison(op, lhs, rhs)?
            }
            _ if result_type.is_float() => self.compile_float_arith(op, lhs, rhs, span)?,
            _ => self.compile_int_arith(op, lhs, rhs, span),
        })
    }

    /// Integer `+ - & | ^ * / %`. Constant-folds whenever both operands are
    /// already compile-time constants; `fold_int` below decides which
    /// operators fold.
    fn compile_int_arith(&mut self, op: BinOp, lhs: GenValue, rhs: GenValue, span: Span) -> GenValue {
        if let (Location::IntConstant(l), Location::IntConstant(r)) = (&lhs.location, &rhs.location) {
            if let Some(folded) = fold_int(op, *l, *r) {
                return GenValue::new(lhs.data_type, Location::IntConstant(folded));
            }
        }

        let ty = lhs.data_type.clone();
        let width = ty.size().max(1);
        let rax = GpRegister::Rax.name(width);
        let rbx = GpRegister::Rbx.name(width);
        self.emit(format!("mov {rax}, {}", self.emit_result(&lhs.location, &lhs.data_type)));
        self.emit(format!("mov {rbx}, {}", self.emit_result(&rhs.location, &rhs.data_type)));
        self.free_if_is_temp(&lhs);
        self.free_if_is_temp(&rhs);

        match op {
            BinOp::Add => self.emit(format!("add {rax}, {rbx}")),
            BinOp::Sub => self.emit(format!("sub {rax}, {rbx}")),
            BinOp::BitAnd => self.emit(format!("and {rax}, {rbx}")),
            BinOp::BitOr => self.emit(format!("or {rax}, {rbx}")),
            BinOp::BitXor => self.emit(format!("xor {rax}, {rbx}")),
            BinOp::Mul => {
                if ty.is_unsigned() {
                    self.emit(format!("mul {rbx}"));
                } else {
                    self.emit(format!("imul {rax}, {rbx}"));
                }
            }
            BinOp::Div | BinOp::Mod => {
                if ty.is_unsigned() {
                    self.emit(format!("xor {}, {}", GpRegister::Rdx.name(width), GpRegister::Rdx.name(width)));
                    self.emit(format!("div {rbx}"));
                } else {
                    self.emit(if width == 8 { "cqo" } else { "cdq" });
                    self.emit(format!("idiv {rbx}"));
                }
                let result_reg =
                    if op == BinOp::Div { rax.to_string() } else { GpRegister::Rdx.name(width).to_string() };
                let temp = self.allocate_temp(ty);
                self.emit(format!("mov {}, {result_reg}", self.emit_result(&temp.location, &temp.data_type)));
                return temp;
            }
            _ => {
                self.report_bad_operand_types(span, &ty, &ty);
                return GenValue::error();
            }
        }

        let temp = self.allocate_temp(ty);
        self.emit(format!("mov {}, {rax}", self.emit_result(&temp.location, &temp.data_type)));
        temp
    }

    fn compile_float_arith(&mut self, op: BinOp, lhs: GenValue, rhs: GenValue, span: Span) -> Result<GenValue> {
        let ty = lhs.data_type.clone();
        let suffix = if matches!(ty, DataType::Float) { "ss" } else { "sd" };
        let mnemonic = match op {
            BinOp::Add => format!("add{suffix}"),
            BinOp::Sub => format!("sub{suffix}"),
            BinOp::Mul => format!("mul{suffix}"),
            BinOp::Div => format!("div{suffix}"),
            _ => {
                self.report_bad_operand_types(span, &ty, &rhs.data_type);
                return Ok(GenValue::error());
            }
        };
        let l = self.load_into_simd(&lhs)?;
        let r = self.load_into_simd(&rhs)?;
        self.free_if_is_temp(&lhs);
        self.free_if_is_temp(&rhs);
        self.emit(format!("{mnemonic} {}, {}", l.name(), r.name()));
        let temp = self.allocate_temp(ty);
        self.store_simd_to_temp(l, &temp);
        self.simd.free(l);
        self.simd.free(r);
        Ok(temp)
    }

    fn compile_comparison(&mut self, op: BinOp, lhs: GenValue, rhs: GenValue) -> Result<GenValue> {
        if let (Location::IntConstant(l), Location::IntConstant(r)) = (&lhs.location, &rhs.location) {
            if let Some(folded) = fold_int(op, *l, *r) {
                return Ok(GenValue::new(DataType::int(), Location::IntConstant(folded)));
            }
        }

        let is_float = lhs.data_type.is_float();
        let unsigned_or_float = is_float || lhs.data_type.is_unsigned();

        if is_float {
            let l = self.load_into_simd(&lhs)?;
            let r = self.load_into_simd(&rhs)?;
            self.free_if_is_temp(&lhs);
            self.free_if_is_temp(&rhs);
            let cmp = if matches!(lhs.data_type, DataType::Float) { "comiss" } else { "comisd" };
            self.emit(format!("{cmp} {}, {}", l.name(), r.name()));
            self.simd.free(l);
            self.simd.free(r);
        } else {
            let width = lhs.data_type.size().max(1);
            let rax = GpRegister::Rax.name(width);
            let rbx = GpRegister::Rbx.name(width);
            self.emit(format!("mov {rax}, {}", self.emit_result(&lhs.location, &lhs.data_type)));
            self.emit(format!("mov {rbx}, {}", self.emit_result(&rhs.location, &rhs.data_type)));
            self.emit(format!("cmp {rax}, {rbx}"));
            self.free_if_is_temp(&lhs);
            self.free_if_is_temp(&rhs);
        }

        self.emit(format!("{} al", condition_mnemonic(op, unsigned_or_float)));
        self.emit("movzx eax, al");
        let temp = self.allocate_temp(DataType::int());
        self.emit(format!("mov {}, eax", self.emit_result(&temp.location, &temp.data_type)));
        Ok(temp)
    }

    /// `&&`/`||` short-circuit: the right operand is only evaluated when
    /// the left doesn't already decide the result, and the value
    /// normalizes to a canonical `0`/`1` int.
    fn compile_logical(&mut self, is_and: bool, left: &Expr, right: &Expr) -> Result<GenValue> {
        let lhs = self.compile_expression(left)?;
        if lhs.is_error() {
            return Ok(GenValue::error());
        }
        self.load_truth_into_eax(&lhs)?;
        self.free_if_is_temp(&lhs);

        let short_circuit = self.fresh_label();
        let end = self.fresh_label();
        self.emit("cmp eax, 0");
        self.emit(format!("{} .L{short_circuit}", if is_and { "je" } else { "jne" }));

        let rhs = self.compile_expression(right)?;
        if rhs.is_error() {
            return Ok(GenValue::error());
        }
        self.load_truth_into_eax(&rhs)?;
        self.free_if_is_temp(&rhs);
        self.emit("cmp eax, 0");
        self.emit("setne al");
        self.emit("movzx eax, al");
        self.emit(format!("jmp .L{end}"));

        self.emit_label(&format!(".L{short_circuit}"));
        self.emit(format!("mov eax, {}", if is_and { 0 } else { 1 }));
        self.emit_label(&format!(".L{end}"));

        let temp = self.allocate_temp(DataType::int());
        self.emit(format!("mov {}, eax", self.emit_result(&temp.location, &temp.data_type)));
        Ok(temp)
    }

    /// Loads `value`'s truth value (nonzero-ness) into `eax` without
    /// normalizing it to 0/1 — callers immediately follow with `cmp eax, 0`.
    fn load_truth_into_eax(&mut self, value: &GenValue) -> Result<()> {
        if value.data_type.is_float() {
            let reg = self.load_into_simd(value)?;
            let zero = self.simd.allocate().ok_or(CodeGenError::SimdRegisterPoolExhausted)?;
            self.emit(format!("pxor {}, {}", zero.name(), zero.name()));
            let cmp = if matches!(value.data_type, DataType::Float) { "comiss" } else { "comisd" };
            self.emit(format!("{cmp} {}, {}", reg.name(), zero.name()));
            self.emit("setne al");
            self.emit("movzx eax, al");
            self.simd.free(reg);
            self.simd.free(zero);
        } else {
            let width = value.data_type.size().max(1);
            let reg = GpRegister::Rax.name(width);
            self.emit(format!("mov {reg}, {}", self.emit_result(&value.location, &value.data_type)));
            if width < 4 {
                self.emit("movzx eax, al");
            }
        }
        Ok(())
    }

    fn compile_assignment(&mut self, target: &Expr, value: &Expr, span: Span) -> Result<GenValue> {
        let Expr::Identifier { name, span: ident_span } = target else {
            self.report_not_lvalue(span);
            self.compile_expression(value)?;
            return Ok(GenValue::error());
        };
        let Some(var) = self.scopes.lookup(*name).cloned() else {
            self.report_undeclared(*ident_span, *name);
            self.compile_expression(value)?;
            return Ok(GenValue::error());
        };
        if var.data_type.is_error() {
            self.compile_expression(value)?;
            return Ok(GenValue::error());
        }

        let rhs = self.compile_expression(value)?;
        if rhs.is_error() {
            return Ok(GenValue::error());
        }
        let converted = self.convert_to_type(rhs, &var.data_type, span)?;
        if converted.is_error() {
            return Ok(GenValue::error());
        }

        // A raw register-mediated copy: correct for both int and float
        // operands, since `mov` moves bits without interpreting them.
        let width = var.data_type.size().max(1);
        let reg = GpRegister::Rax.name(width);
        self.emit(format!("mov {reg}, {}", self.emit_result(&converted.location, &converted.data_type)));
        self.emit(format!(
            "mov {}, {reg}",
            self.emit_result(&Location::BaseOffset(var.base_offset), &var.data_type)
        ));
        self.free_if_is_temp(&converted);

        let temp = self.allocate_temp(var.data_type.clone());
        self.emit(format!("mov {}, {reg}", self.emit_result(&temp.location, &temp.data_type)));
        Ok(temp)
    }

    /// Emits whatever instructions turn `value` into the requested `target`
    /// type. `faxc-sem::classify_conversion` decides *which* conversion;
    /// this is the one place that decides *how* to emit it.
    fn convert_to_type(&mut self, value: GenValue, target: &DataType, span: Span) -> Result<GenValue> {
        if value.is_error() || target.is_error() {
            return Ok(GenValue::error());
        }
        if matches!(target, DataType::LongDouble) || matches!(value.data_type, DataType::LongDouble) {
            self.report_unsupported_type(span, target);
            return Ok(GenValue::error());
        }

        Ok(match classify_conversion(&value.data_type, target) {
            Some(Conversion::Identity) => value,
            Some(Conversion::IntTruncate) => GenValue::new(target.clone(), value.location),
            Some(Conversion::IntZeroExtend) => self.emit_int_extend(value, target, "movzx"),
            Some(Conversion::IntSignExtend) => self.emit_int_extend(value, target, "movsx"),
            Some(Conversion::IntToFloat) => {
                if let Location::IntConstant(v) = value.location {
                    let label = self.emit_float_constant(v as f64, target);
                    return Ok(GenValue::new(target.clone(), Location::Label(label)));
                }
                self.emit(format!("movsx rax, {}", self.emit_result(&value.location, &value.data_type)));
                self.free_if_is_temp(&value);
                let cvt = if matches!(target, DataType::Float) { "cvtsi2ss" } else { "cvtsi2sd" };
                let xmm = self.simd.allocate().ok_or(CodeGenError::SimdRegisterPoolExhausted)?;
                self.emit(format!("{cvt} {}, rax", xmm.name()));
                let temp = self.allocate_temp(target.clone());
                self.store_simd_to_temp(xmm, &temp);
                self.simd.free(xmm);
                temp
            }
            Some(Conversion::FloatToInt) => {
                let cvt = if matches!(value.data_type, DataType::Float) { "cvtss2si" } else { "cvtsd2si" };
                let xmm = self.load_into_simd(&value)?;
                self.free_if_is_temp(&value);
                self.emit(format!("{cvt} rax, {}", xmm.name()));
                self.simd.free(xmm);
                let to_width = target.size().max(1);
                let temp = self.allocate_temp(target.clone());
                self.emit(format!(
                    "mov {}, {}",
                    self.emit_result(&temp.location, &temp.data_type),
                    GpRegister::Rax.name(to_width)
                ));
                temp
            }
            Some(Conversion::FloatToFloat) => {
                let cvt = if matches!(target, DataType::Double) { "cvtss2sd" } else { "cvtsd2ss" };
                let xmm = self.load_into_simd(&value)?;
                self.free_if_is_temp(&value);
                self.emit(format!("{cvt} {}, {}", xmm.name(), xmm.name()));
                let temp = self.allocate_temp(target.clone());
                self.store_simd_to_temp(xmm, &temp);
                self.simd.free(xmm);
                temp
            }
            None => {
                self.report_bad_operand_types(span, &value.data_type, target);
                GenValue::error()
            }
        })
    }

    fn emit_int_extend(&mut self, value: GenValue, target: &DataType, mnemonic: &str) -> GenValue {
        if let Location::IntConstant(v) = value.location {
            return GenValue::new(target.clone(), Location::IntConstant(v));
        }
        let to_width = target.size().max(1);
        self.emit(format!(
            "{mnemonic} {}, {}",
            GpRegister::Rax.name(to_width),
            self.emit_result(&value.location, &value.data_type)
        ));
        self.free_if_is_temp(&value);
        let temp = self.allocate_temp(target.clone());
        self.emit(format!("mov {}, {}", self.emit_result(&temp.location, &temp.data_type), GpRegister::Rax.name(to_width)));
        temp
    }

    // ---- diagnostics -------------------------------------------------

    fn report_undeclared(&self, span: Span, name: Symbol) {
        self.handler
            .build_error(span, format!("use of undeclared variable '{}'", name.as_str()))
            .code(DiagnosticCode::E_SEMANTIC_UNDECLARED_VAR)
            .emit(self.handler);
    }

    fn report_redeclaration(&self, span: Span, name: Symbol) {
        self.handler
            .build_error(span, format!("redeclaration of '{}'", name.as_str()))
            .code(DiagnosticCode::E_SEMANTIC_REDECLARATION)
            .emit(self.handler);
    }

    fn report_not_lvalue(&self, span: Span) {
        self.handler
            .build_error(span, "left-hand side of assignment is not an lvalue".to_string())
            .code(DiagnosticCode::E_SEMANTIC_NOT_LVALUE)
            .emit(self.handler);
    }

    fn report_bad_operand_types(&self, span: Span, a: &DataType, b: &DataType) {
        self.handler
            .build_error(span, format!("invalid operand types ({a:?} and {b:?})"))
            .code(DiagnosticCode::E_SEMANTIC_BAD_OPERAND_TYPES)
            .emit(self.handler);
    }

    fn report_unsupported_type(&self, span: Span, ty: &DataType) {
        self.handler
            .build_error(span, format!("{ty:?} is not supported by this code generator"))
            .code(DiagnosticCode::E_SEMANTIC_UNSUPPORTED_TYPE)
            .emit(self.handler);
    }

    fn report_loop_control_outside_loop(&self, span: Span, what: &str) {
        self.handler
            .build_error(span, format!("'{what}' used outside of a loop"))
            .code(DiagnosticCode::E_SEMANTIC_LOOP_CONTROL_OUTSIDE_LOOP)
            .emit(self.handler);
    }
}

fn is_supported_scalar(ty: &DataType) -> bool {
    ty.is_integer() || matches!(ty, DataType::Float | DataType::Double)
}

fn size_keyword(width: u32) -> &'static str {
    match width {
        1 => "BYTE",
        2 => "WORD",
        4 => "DWORD",
        _ => "QWORD",
    }
}

fn format_float_literal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Constant-folds `+ - & | ^ == != < <= > >=` and `*` — `2 + 3 * 4` only
/// reduces whole to the constant `14` if the nested multiplication folds
/// too. `/` and `%` fold when the divisor is a nonzero constant; a literal
/// zero divisor is left to emit a real `div` instruction so the program
/// traps at runtime exactly as C would.
fn fold_int(op: BinOp, l: i128, r: i128) -> Option<i128> {
    Some(match op {
        BinOp::Add => l.wrapping_add(r),
        BinOp::Sub => l.wrapping_sub(r),
        BinOp::Mul => l.wrapping_mul(r),
        BinOp::Div if r != 0 => l.wrapping_div(r),
        BinOp::Mod if r != 0 => l.wrapping_rem(r),
        BinOp::BitAnd => l & r,
        BinOp::BitOr => l | r,
        BinOp::BitXor => l ^ r,
        BinOp::EqEq => (l == r) as i128,
        BinOp::NotEq => (l != r) as i128,
        BinOp::Lt => (l < r) as i128,
        BinOp::Le => (l <= r) as i128,
        BinOp::Gt => (l > r) as i128,
        BinOp::Ge => (l >= r) as i128,
        _ => return None,
    })
}

fn condition_mnemonic(op: BinOp, unsigned_or_float: bool) -> &'static str {
    match (op, unsigned_or_float) {
        (BinOp::Lt, true) => "setb",
        (BinOp::Lt, false) => "setl",
        (BinOp::Le, true) => "setbe",
        (BinOp::Le, false) => "setle",
        (BinOp::Gt, true) => "seta",
        (BinOp::Gt, false) => "setg",
        (BinOp::Ge, true) => "setae",
        (BinOp::Ge, false) => "setge",
        (BinOp::EqEq, _) => "sete",
        (BinOp::NotEq, _) => "setne",
        _ => unreachable!("condition_mnemonic called with a non-comparison operator"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_lex::Lexer;
    use faxc_par::Parser;

    fn compile(source: &str) -> (String, usize) {
        let handler = Handler::new();
        let tokens = Lexer::new(source, &handler).tokenize();
        let program = Parser::new(tokens, &handler).parse_program();
        let asm = CodeGenerator::new(&handler).generate(&program).expect("codegen should succeed in tests");
        (asm, handler.error_count())
    }

    #[test]
    fn fold_int_applies_to_the_folding_law_operators() {
        assert_eq!(fold_int(BinOp::Add, 2, 3), Some(5));
        assert_eq!(fold_int(BinOp::Sub, 5, 3), Some(2));
        assert_eq!(fold_int(BinOp::BitAnd, 0b110, 0b011), Some(0b010));
        assert_eq!(fold_int(BinOp::BitOr, 0b100, 0b001), Some(0b101));
        assert_eq!(fold_int(BinOp::BitXor, 0b110, 0b011), Some(0b101));
        assert_eq!(fold_int(BinOp::EqEq, 4, 4), Some(1));
        assert_eq!(fold_int(BinOp::NotEq, 4, 4), Some(0));
        assert_eq!(fold_int(BinOp::Lt, 1, 2), Some(1));
        assert_eq!(fold_int(BinOp::Le, 2, 2), Some(1));
        assert_eq!(fold_int(BinOp::Gt, 2, 1), Some(1));
        assert_eq!(fold_int(BinOp::Ge, 2, 2), Some(1));
    }

    #[test]
    fn fold_int_folds_multiplication_and_nonzero_division_and_modulo() {
        assert_eq!(fold_int(BinOp::Mul, 6, 2), Some(12));
        assert_eq!(fold_int(BinOp::Div, 6, 2), Some(3));
        assert_eq!(fold_int(BinOp::Mod, 6, 4), Some(2));
    }

    #[test]
    fn fold_int_refuses_division_by_a_literal_zero() {
        assert_eq!(fold_int(BinOp::Div, 6, 0), None);
        assert_eq!(fold_int(BinOp::Mod, 6, 0), None);
    }

    #[test]
    fn fold_int_wraps_on_overflow_rather_than_panicking() {
        assert_eq!(fold_int(BinOp::Add, i128::from(i64::MAX), 1), Some(i128::from(i64::MAX) + 1));
    }

    /// For every operator `fold_int` claims to handle, the folded result
    /// must agree with evaluating the same operator directly on the
    /// operands. Operands are kept within `i64` so the reference
    /// expressions below can't themselves overflow `i128` and give a false
    /// mismatch.
    #[quickcheck_macros::quickcheck]
    fn prop_fold_int_matches_reference_evaluation_for_add_sub_and_bitwise_ops(l: i64, r: i64) -> bool {
        let (l, r) = (i128::from(l), i128::from(r));
        fold_int(BinOp::Add, l, r) == Some(l.wrapping_add(r))
            && fold_int(BinOp::Sub, l, r) == Some(l.wrapping_sub(r))
            && fold_int(BinOp::BitAnd, l, r) == Some(l & r)
            && fold_int(BinOp::BitOr, l, r) == Some(l | r)
            && fold_int(BinOp::BitXor, l, r) == Some(l ^ r)
            && fold_int(BinOp::EqEq, l, r) == Some((l == r) as i128)
            && fold_int(BinOp::Lt, l, r) == Some((l < r) as i128)
    }

    /// Same law for `/` and `%`: only claims anything when the divisor is
    /// nonzero, matching `fold_int`'s own refusal to fold division by zero.
    #[quickcheck_macros::quickcheck]
    fn prop_fold_int_matches_reference_division_and_modulo_for_nonzero_divisors(l: i64, r: i64) -> bool {
        if r == 0 {
            return true;
        }
        let (l, r) = (i128::from(l), i128::from(r));
        fold_int(BinOp::Div, l, r) == Some(l.wrapping_div(r)) && fold_int(BinOp::Mod, l, r) == Some(l.wrapping_rem(r))
    }

    #[test]
    fn condition_mnemonic_distinguishes_signed_unsigned_and_equality() {
        assert_eq!(condition_mnemonic(BinOp::Lt, false), "setl");
        assert_eq!(condition_mnemonic(BinOp::Lt, true), "setb");
        assert_eq!(condition_mnemonic(BinOp::Ge, false), "setge");
        assert_eq!(condition_mnemonic(BinOp::Ge, true), "setae");
        assert_eq!(condition_mnemonic(BinOp::EqEq, false), "sete");
        assert_eq!(condition_mnemonic(BinOp::EqEq, true), "sete");
        assert_eq!(condition_mnemonic(BinOp::NotEq, false), "setne");
    }

    #[test]
    fn size_keyword_covers_every_scalar_width() {
        assert_eq!(size_keyword(1), "BYTE");
        assert_eq!(size_keyword(2), "WORD");
        assert_eq!(size_keyword(4), "DWORD");
        assert_eq!(size_keyword(8), "QWORD");
    }

    #[test]
    fn format_float_literal_keeps_a_decimal_point_on_whole_numbers() {
        assert_eq!(format_float_literal(2.0), "2.0");
        assert_eq!(format_float_literal(3.5), "3.5");
    }

    #[test]
    fn is_supported_scalar_accepts_integers_and_float_double_only() {
        assert!(is_supported_scalar(&DataType::int()));
        assert!(is_supported_scalar(&DataType::Double));
        assert!(is_supported_scalar(&DataType::Float));
        assert!(!is_supported_scalar(&DataType::LongDouble));
        assert!(!is_supported_scalar(&DataType::Struct));
    }

    #[test]
    fn generate_emits_the_entry_point_and_exit_syscall() {
        let (asm, errors) = compile("return 42;\n");
        assert_eq!(errors, 0);
        assert!(asm.contains("global _start"));
        assert!(asm.contains("_start:"));
        assert!(asm.contains("mov rax, 42"), "asm was:\n{asm}");
        assert!(asm.contains("mov rax, 60"));
        assert!(asm.contains("syscall"));
        assert!(asm.contains("section .data"));
    }

    #[test]
    fn generate_emits_the_exit_syscall_exactly_once_when_return_is_the_last_statement() {
        let (asm, errors) = compile("return 42;\n");
        assert_eq!(errors, 0);
        assert_eq!(asm.matches("mov rax, 60").count(), 1, "asm was:\n{asm}");
        assert_eq!(asm.matches("syscall").count(), 1, "asm was:\n{asm}");
    }

    #[test]
    fn generate_falls_through_a_non_final_return_instead_of_exiting_early() {
        let (asm, errors) = compile("if (1) { return 1; } putchar(65);\n");
        assert_eq!(errors, 0);
        // The `if` body's `return` must not emit its own exit syscall: only
        // one `mov rax, 60`/`syscall` pair may appear, after the `putchar`.
        assert_eq!(asm.matches("mov rax, 60").count(), 1, "asm was:\n{asm}");
        let exit_pos = asm.find("mov rax, 60").unwrap();
        let putchar_pos = asm.find("mov rdx, 1").unwrap();
        assert!(putchar_pos < exit_pos, "putchar's syscall must precede the program exit:\n{asm}");
    }

    #[test]
    fn generate_folds_constant_arithmetic_at_compile_time() {
        let (asm, errors) = compile("int x = 2 + 3 * 4;\n");
        assert_eq!(errors, 0);
        assert!(asm.contains("eax, 14"), "asm was:\n{asm}");
        assert!(asm.contains("mov DWORD [rbp-4], eax"), "asm was:\n{asm}");
    }

    #[test]
    fn generate_reports_use_of_undeclared_variable() {
        let (_asm, errors) = compile("int a = b;\n");
        assert_eq!(errors, 1);
    }
}
